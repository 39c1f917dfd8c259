//! Database error types.

use thiserror::Error;

/// Errors that can occur when using the document store.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to open the database.
    #[error("Failed to open database: {0}")]
    OpenError(String),

    /// Failed to execute a query.
    #[error("Query execution failed: {0}")]
    QueryError(String),

    /// Failed to (de)serialize a document.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// No document with the requested id.
    #[error("{collection} not found: {id}")]
    NotFound { collection: String, id: String },

    /// Unknown storage backend in configuration.
    #[error("Unknown storage backend: {0}")]
    UnknownBackend(String),
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::SerializationError(e.to_string())
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        DbError::QueryError(e.to_string())
    }
}
