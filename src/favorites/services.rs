use tracing::{debug, info, instrument};

use crate::{error::StoreError, store::LocalStore};

impl LocalStore {
    /// Marks a lab as favorite. Repeating the call changes nothing.
    #[instrument(skip(self))]
    pub async fn add_favorite(&self, lab_id: &str) -> Result<(), StoreError> {
        let (added, user) = self
            .update_current(|record| {
                if record.favorites.iter().any(|f| f == lab_id) {
                    return (false, false);
                }
                record.favorites.push(lab_id.to_string());
                (true, true)
            })
            .await?;
        if added {
            info!(user_id = %user.id, "favorite added");
        } else {
            debug!(user_id = %user.id, "favorite already present");
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_favorite(&self, lab_id: &str) -> Result<(), StoreError> {
        let (removed, user) = self
            .update_current(|record| {
                let before = record.favorites.len();
                record.favorites.retain(|f| f != lab_id);
                let removed = record.favorites.len() != before;
                (removed, removed)
            })
            .await?;
        if removed {
            info!(user_id = %user.id, "favorite removed");
        }
        Ok(())
    }

    pub async fn favorites(&self) -> Vec<String> {
        self.read_current(|record| record.favorites.clone())
            .await
            .unwrap_or_default()
    }
}
