//! Typed access to a collection of documents.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{DbError, DocumentStore};

/// A record that can be persisted in a [`Collection`].
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// Name of the collection the record lives in.
    const COLLECTION: &'static str;

    /// Primary key of the record.
    fn id(&self) -> &str;
}

/// Typed view over one collection of a [`DocumentStore`].
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    /// Create a collection handle over `store`.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Fetch a record by id.
    pub async fn get(&self, id: &str) -> Result<Option<T>, DbError> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Fetch a record by id, failing with [`DbError::NotFound`] if absent.
    pub async fn require(&self, id: &str) -> Result<T, DbError> {
        self.get(id).await?.ok_or_else(|| DbError::NotFound {
            collection: T::COLLECTION.to_string(),
            id: id.to_string(),
        })
    }

    /// Insert or replace a record.
    pub async fn save(&self, doc: &T) -> Result<(), DbError> {
        let value = serde_json::to_value(doc)?;
        self.store.put(T::COLLECTION, doc.id(), value).await
    }

    /// Insert a record. Alias for [`Collection::save`] that reads better at
    /// creation sites.
    pub async fn insert(&self, doc: &T) -> Result<(), DbError> {
        self.save(doc).await
    }

    /// Delete a record by id. Returns whether it existed.
    pub async fn delete(&self, id: &str) -> Result<bool, DbError> {
        self.store.delete(T::COLLECTION, id).await
    }

    /// All records in insertion order.
    pub async fn all(&self) -> Result<Vec<T>, DbError> {
        self.store
            .list(T::COLLECTION)
            .await?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(DbError::from))
            .collect()
    }

    /// Records matching `predicate`, in insertion order.
    pub async fn find<F>(&self, predicate: F) -> Result<Vec<T>, DbError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.all().await?.into_iter().filter(|doc| predicate(doc)).collect())
    }

    /// First record matching `predicate`.
    pub async fn find_one<F>(&self, predicate: F) -> Result<Option<T>, DbError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.all().await?.into_iter().find(|doc| predicate(doc)))
    }
}
