use crate::config::{AppConfig, StorageBackend, StorageKeys, DEFAULT_COMPARISON_CAPACITY};
use crate::i18n::Locale;
use crate::storage::{FileStorage, KeyValueStore, MemoryStorage, S3Storage};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn KeyValueStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let storage = match &config.backend {
            StorageBackend::Memory => Arc::new(MemoryStorage::new()) as Arc<dyn KeyValueStore>,
            StorageBackend::File { dir } => {
                Arc::new(FileStorage::new(dir).await?) as Arc<dyn KeyValueStore>
            }
            StorageBackend::S3(s3) => Arc::new(S3Storage::new(s3).await?) as Arc<dyn KeyValueStore>,
        };

        tracing::info!(backend = config.backend.kind(), locale = ?config.locale, "storage ready");
        Ok(Self { config, storage })
    }

    pub fn from_parts(config: Arc<AppConfig>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self { config, storage }
    }

    /// In-memory state with default keys and the English catalogue.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            backend: StorageBackend::Memory,
            keys: StorageKeys::default(),
            locale: Locale::En,
            comparison_capacity: DEFAULT_COMPARISON_CAPACITY,
        });
        let storage = Arc::new(MemoryStorage::new()) as Arc<dyn KeyValueStore>;
        Self { config, storage }
    }
}
