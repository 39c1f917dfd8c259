//! In-memory document store.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{DbError, DocumentStore};

/// One collection: documents by id plus the insertion order.
#[derive(Default)]
struct Bucket {
    docs: HashMap<String, Value>,
    order: Vec<String>,
}

/// Document store held entirely in process memory.
///
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Bucket>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DbError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|bucket| bucket.docs.get(id))
            .cloned())
    }

    async fn put(&self, collection: &str, id: &str, doc: Value) -> Result<(), DbError> {
        let mut collections = self.collections.write().await;
        let bucket = collections.entry(collection.to_string()).or_default();
        if bucket.docs.insert(id.to_string(), doc).is_none() {
            bucket.order.push(id.to_string());
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, DbError> {
        let mut collections = self.collections.write().await;
        let Some(bucket) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let removed = bucket.docs.remove(id).is_some();
        if removed {
            bucket.order.retain(|existing| existing != id);
        }
        Ok(removed)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, DbError> {
        let collections = self.collections.read().await;
        let Some(bucket) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(bucket
            .order
            .iter()
            .filter_map(|id| bucket.docs.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryStore::new();
        store.put("products", "p1", json!({"id": "p1"})).await.unwrap();

        let doc = store.get("products", "p1").await.unwrap();
        assert_eq!(doc, Some(json!({"id": "p1"})));

        assert!(store.delete("products", "p1").await.unwrap());
        assert!(!store.delete("products", "p1").await.unwrap());
        assert!(store.get("products", "p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = MemoryStore::new();
        store.put("c", "b", json!(1)).await.unwrap();
        store.put("c", "a", json!(2)).await.unwrap();
        // Replacing keeps the original position
        store.put("c", "b", json!(3)).await.unwrap();

        let docs = store.list("c").await.unwrap();
        assert_eq!(docs, vec![json!(3), json!(2)]);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = MemoryStore::new();
        store.put("users", "1", json!("user")).await.unwrap();
        assert!(store.get("orders", "1").await.unwrap().is_none());
    }
}
