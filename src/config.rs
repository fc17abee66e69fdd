use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

use crate::i18n::Locale;

pub const DEFAULT_COMPARISON_CAPACITY: usize = 3;

/// Connection settings for an S3-compatible bucket (MinIO in development).
#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub enum StorageBackend {
    Memory,
    File { dir: PathBuf },
    S3(S3Config),
}

impl StorageBackend {
    pub fn kind(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::File { .. } => "file",
            StorageBackend::S3(_) => "s3",
        }
    }
}

/// Names of the persisted entries.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageKeys {
    pub users: String,
    pub session: String,
    pub comparison: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            users: "clinicalabUsers".into(),
            session: "currentUser".into(),
            comparison: "comparisonList".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub backend: StorageBackend,
    pub keys: StorageKeys,
    pub locale: Locale,
    pub comparison_capacity: usize,
}

impl AppConfig {
    /// Reads settings from the environment, after loading `.env` if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "file".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            "file" => StorageBackend::File {
                dir: std::env::var("STORAGE_DIR")
                    .unwrap_or_else(|_| "./data".into())
                    .into(),
            },
            "s3" => StorageBackend::S3(S3Config {
                endpoint: std::env::var("MINIO_ENDPOINT").context("MINIO_ENDPOINT")?,
                bucket: std::env::var("MINIO_BUCKET").context("MINIO_BUCKET")?,
                access_key: std::env::var("MINIO_ACCESS_KEY").context("MINIO_ACCESS_KEY")?,
                secret_key: std::env::var("MINIO_SECRET_KEY").context("MINIO_SECRET_KEY")?,
                region: std::env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".into()),
                prefix: std::env::var("MINIO_PREFIX").unwrap_or_else(|_| "clinicalab/".into()),
            }),
            other => anyhow::bail!("unknown STORAGE_BACKEND {other:?}"),
        };

        let defaults = StorageKeys::default();
        let keys = StorageKeys {
            users: std::env::var("STORAGE_KEY_USERS").unwrap_or(defaults.users),
            session: std::env::var("STORAGE_KEY_SESSION").unwrap_or(defaults.session),
            comparison: std::env::var("STORAGE_KEY_COMPARISON").unwrap_or(defaults.comparison),
        };

        let locale = match std::env::var("APP_LOCALE") {
            Ok(v) => v.parse::<Locale>()?,
            Err(_) => Locale::default(),
        };

        let comparison_capacity = std::env::var("COMPARISON_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_COMPARISON_CAPACITY);

        Ok(Self {
            backend,
            keys,
            locale,
            comparison_capacity,
        })
    }
}
