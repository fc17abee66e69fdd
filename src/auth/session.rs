use crate::auth::dto::PublicUser;
use crate::storage::{read_json, write_json, KeyValueStore};

pub async fn load(storage: &dyn KeyValueStore, key: &str) -> anyhow::Result<Option<PublicUser>> {
    read_json(storage, key).await
}

pub async fn save(storage: &dyn KeyValueStore, key: &str, user: &PublicUser) -> anyhow::Result<()> {
    write_json(storage, key, user).await
}

pub async fn clear(storage: &dyn KeyValueStore, key: &str) -> anyhow::Result<()> {
    storage.remove_item(key).await
}
