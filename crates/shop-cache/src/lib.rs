//! Expiring key-value cache for the storefront API.
//!
//! Holds short-lived state that does not belong in the document store:
//! login sessions and one-time passcodes. Values are JSON-serialized and
//! every entry may carry its own time-to-live.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_cache::{cache_key, Cache};
//! use std::time::Duration;
//!
//! let cache = Cache::new();
//!
//! // Store a value for five minutes
//! cache.set_with_ttl(&cache_key!("otp", user_id), &code, Duration::from_secs(300))?;
//!
//! // Retrieve a value
//! let code: Option<OtpCode> = cache.get(&cache_key!("otp", user_id))?;
//!
//! // Consume a value
//! let code: Option<OtpCode> = cache.take(&cache_key!("otp", user_id))?;
//! ```

mod error;
mod kv;
mod session;

pub use error::CacheError;
pub use kv::Cache;
pub use session::{Session, SessionData, SessionId};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{cache_key, Cache, CacheError, Session, SessionId};
}
