use serde::{Deserialize, Serialize};

use crate::auth::repo_types::UserRecord;
use crate::storage::{read_json, write_json, KeyValueStore};

/// Every registered user, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Directory {
    users: Vec<UserRecord>,
}

impl Directory {
    /// Load the directory blob; a missing entry is an empty directory.
    pub async fn load(storage: &dyn KeyValueStore, key: &str) -> anyhow::Result<Directory> {
        Ok(read_json(storage, key).await?.unwrap_or_default())
    }

    /// Serialize and store the whole directory.
    pub async fn save(&self, storage: &dyn KeyValueStore, key: &str) -> anyhow::Result<()> {
        write_json(storage, key, self).await
    }

    /// Find a user by exact email.
    pub fn find_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut UserRecord> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    /// Append a user. Callers check email uniqueness first.
    pub fn insert(&mut self, user: UserRecord) {
        self.users.push(user);
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
