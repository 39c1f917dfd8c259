//! Document store for the storefront API.
//!
//! Every persisted record is a JSON document addressed by `(collection, id)`.
//! Two backends implement [`DocumentStore`]:
//!
//! - [`MemoryStore`] keeps documents in process memory (tests, local development)
//! - [`SqliteStore`] persists documents in a single SQLite table
//!
//! Application code works through the typed [`Collection`] wrapper.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_db::{Collection, Document, MemoryStore};
//! use serde::{Serialize, Deserialize};
//! use std::sync::Arc;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Product {
//!     id: String,
//!     title: String,
//! }
//!
//! impl Document for Product {
//!     const COLLECTION: &'static str = "products";
//!     fn id(&self) -> &str {
//!         &self.id
//!     }
//! }
//!
//! let store = Arc::new(MemoryStore::new());
//! let products = Collection::<Product>::new(store);
//! products.insert(&Product { id: "p1".into(), title: "Shirt".into() }).await?;
//! let cheap: Vec<Product> = products.find(|p| p.title.starts_with("S")).await?;
//! ```

mod collection;
mod error;
mod memory;
mod sqlite;
mod store;

pub use collection::{Collection, Document};
pub use error::DbError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{open_store, DocumentStore, StorageBackend, StorageConfig};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Collection, DbError, Document, DocumentStore};
}
