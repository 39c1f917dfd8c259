//! Store trait and backend selection.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{DbError, MemoryStore, SqliteStore};

/// A JSON document store keyed by collection and id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` if absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DbError>;

    /// Insert or replace a document.
    async fn put(&self, collection: &str, id: &str, doc: Value) -> Result<(), DbError>;

    /// Delete a document. Returns whether it existed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, DbError>;

    /// All documents of a collection, in insertion order.
    async fn list(&self, collection: &str) -> Result<Vec<Value>, DbError>;
}

/// Available storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// In-process memory.
    #[default]
    Memory,
    /// SQLite database file.
    Sqlite,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which backend to use.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Connection URL for the SQLite backend.
    #[serde(default = "default_sqlite_url")]
    pub url: String,
}

fn default_sqlite_url() -> String {
    "sqlite://shop.db?mode=rwc".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            url: default_sqlite_url(),
        }
    }
}

/// Open the store described by `config`.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn DocumentStore>, DbError> {
    match config.backend {
        StorageBackend::Memory => {
            info!("using in-memory document store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Sqlite => {
            info!(url = %config.url, "opening sqlite document store");
            let store = SqliteStore::connect(&config.url).await?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parses_lowercase() {
        let config: StorageConfig = serde_json::from_str(r#"{"backend":"sqlite"}"#).unwrap();
        assert_eq!(config.backend, StorageBackend::Sqlite);
        assert_eq!(config.url, default_sqlite_url());
    }

    #[tokio::test]
    async fn test_open_memory_store() {
        let store = open_store(&StorageConfig::default()).await.unwrap();
        assert!(store.list("anything").await.unwrap().is_empty());
    }
}
