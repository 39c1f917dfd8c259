//! Cache errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    /// A value could not be encoded or decoded as JSON.
    #[error("Cache value encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// A writer panicked while holding the entry map.
    #[error("Cache lock poisoned")]
    Poisoned,

    /// A TTL too large to express as a timestamp.
    #[error("Invalid cache TTL: {0}")]
    InvalidTtl(String),
}
