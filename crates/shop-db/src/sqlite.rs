//! SQLite-backed document store.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;

use crate::{DbError, DocumentStore};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS documents (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    UNIQUE (collection, id)
)";

/// Document store persisted in one SQLite table.
///
/// Documents are stored as JSON text; `seq` preserves insertion order for
/// listing.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `url` and create the schema if needed.
    ///
    /// ```rust,ignore
    /// let store = SqliteStore::connect("sqlite://shop.db?mode=rwc").await?;
    /// ```
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| DbError::OpenError(e.to_string()))?
            .create_if_missing(true);

        // In-memory databases are per-connection, so pin the pool to one
        // connection that never gets recycled.
        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DbError::OpenError(e.to_string()))?;

        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DbError> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let body: String = row.try_get("body")?;
                Ok(Some(serde_json::from_str(&body)?))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, collection: &str, id: &str, doc: Value) -> Result<(), DbError> {
        let body = serde_json::to_string(&doc)?;
        sqlx::query(
            "INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)
             ON CONFLICT (collection, id) DO UPDATE SET body = excluded.body",
        )
        .bind(collection)
        .bind(id)
        .bind(body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, DbError> {
        let rows = sqlx::query("SELECT body FROM documents WHERE collection = ? ORDER BY seq")
            .bind(collection)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| -> Result<Value, DbError> {
                let body: String = row.try_get("body")?;
                Ok(serde_json::from_str(&body)?)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn memory_store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_upsert_replaces_body() {
        let store = memory_store().await;
        store.put("carts", "u1", json!({"items": []})).await.unwrap();
        store.put("carts", "u1", json!({"items": [1]})).await.unwrap();

        let doc = store.get("carts", "u1").await.unwrap().unwrap();
        assert_eq!(doc, json!({"items": [1]}));
        assert_eq!(store.list("carts").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = memory_store().await;
        store.put("orders", "o1", json!({})).await.unwrap();
        assert!(store.delete("orders", "o1").await.unwrap());
        assert!(!store.delete("orders", "o1").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_in_insertion_order() {
        let store = memory_store().await;
        store.put("p", "z", json!("first")).await.unwrap();
        store.put("p", "a", json!("second")).await.unwrap();
        store.put("q", "x", json!("other")).await.unwrap();

        let docs = store.list("p").await.unwrap();
        assert_eq!(docs, vec![json!("first"), json!("second")]);
    }
}
