//! Side-by-side lab comparison list, independent of any login.

use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::error::StoreError;
use crate::events::{Notice, NoticeLevel, StoreEvent};
use crate::i18n::{Locale, Message};
use crate::storage::write_json;
use crate::store::LocalStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonChange {
    Added,
    AlreadyListed,
    Removed,
    NotListed,
}

impl ComparisonChange {
    pub fn notice(self, locale: Locale) -> Notice {
        let (level, message) = match self {
            ComparisonChange::Added => (NoticeLevel::Success, Message::ComparisonAdded),
            ComparisonChange::AlreadyListed => (NoticeLevel::Info, Message::ComparisonAlreadyListed),
            ComparisonChange::Removed | ComparisonChange::NotListed => {
                (NoticeLevel::Info, Message::ComparisonRemoved)
            }
        };
        Notice {
            level,
            message: message.render(locale),
        }
    }
}

impl LocalStore {
    pub async fn comparison_list(&self) -> Vec<String> {
        self.lock().await.comparison.clone()
    }

    #[instrument(skip(self))]
    pub async fn add_to_comparison(&self, lab_id: &str) -> Result<ComparisonChange, StoreError> {
        let capacity = self.state().config.comparison_capacity;
        let mut inner = self.lock().await;

        if inner.comparison.iter().any(|id| id == lab_id) {
            return Ok(self.announce(ComparisonChange::AlreadyListed));
        }
        if inner.comparison.len() >= capacity {
            warn!(capacity, "comparison list full");
            let err = StoreError::ComparisonFull { capacity };
            self.emit(StoreEvent::Notice(Notice {
                level: NoticeLevel::Error,
                message: Message::ComparisonFull { capacity }.render(self.locale()),
            }));
            return Err(err);
        }

        let mut next = inner.comparison.clone();
        next.push(lab_id.to_string());
        self.write_comparison(&next).await?;
        inner.comparison = next;

        info!(size = inner.comparison.len(), "lab added to comparison");
        Ok(self.announce(ComparisonChange::Added))
    }

    #[instrument(skip(self))]
    pub async fn remove_from_comparison(
        &self,
        lab_id: &str,
    ) -> Result<ComparisonChange, StoreError> {
        let mut inner = self.lock().await;
        let next: Vec<String> = inner
            .comparison
            .iter()
            .filter(|id| *id != lab_id)
            .cloned()
            .collect();
        if next.len() == inner.comparison.len() {
            return Ok(self.announce(ComparisonChange::NotListed));
        }

        self.write_comparison(&next).await?;
        inner.comparison = next;

        info!(size = inner.comparison.len(), "lab removed from comparison");
        Ok(self.announce(ComparisonChange::Removed))
    }

    fn announce(&self, change: ComparisonChange) -> ComparisonChange {
        self.emit(StoreEvent::Notice(change.notice(self.locale())));
        change
    }

    async fn write_comparison(&self, list: &[String]) -> Result<(), StoreError> {
        let state = self.state();
        write_json(state.storage.as_ref(), &state.config.keys.comparison, list)
            .await
            .map_err(|e| {
                error!(error = %e, "persist comparison list failed");
                StoreError::Storage(e)
            })
    }
}
