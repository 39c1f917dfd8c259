//! In-process key-value store with per-entry expiry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use serde::{de::DeserializeOwned, Serialize};

use crate::CacheError;

struct Entry {
    bytes: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Type-safe cache with automatic JSON serialization.
///
/// Cloning a `Cache` yields another handle to the same entries. Expired
/// entries are invisible to readers and are dropped lazily on access or
/// by [`Cache::purge_expired`].
#[derive(Clone, Default)]
pub struct Cache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl Cache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let code: Option<OtpCode> = cache.get("otp:user123")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let entries = self.read()?;
        match entries.get(key) {
            Some(entry) if entry.is_live(Instant::now()) => {
                Ok(Some(serde_json::from_slice(&entry.bytes)?))
            }
            _ => Ok(None),
        }
    }

    /// Set a value that never expires.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        self.insert(key, value, None)
    }

    /// Set a value that expires after `ttl`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set_with_ttl("otp:user123", &code, Duration::from_secs(300))?;
    /// ```
    pub fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.insert(key, value, Some(Instant::now() + ttl))
    }

    fn insert<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expires_at: Option<Instant>,
    ) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.write()?
            .insert(key.to_string(), Entry { bytes, expires_at });
        Ok(())
    }

    /// Delete a value. Returns whether a live entry was removed.
    pub fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let removed = self.write()?.remove(key);
        Ok(removed.is_some_and(|entry| entry.is_live(Instant::now())))
    }

    /// Check if a live entry exists for `key`.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let entries = self.read()?;
        Ok(entries
            .get(key)
            .is_some_and(|entry| entry.is_live(Instant::now())))
    }

    /// Remove and return a value in one step.
    pub fn take<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let removed = self.write()?.remove(key);
        match removed {
            Some(entry) if entry.is_live(Instant::now()) => {
                Ok(Some(serde_json::from_slice(&entry.bytes)?))
            }
            _ => Ok(None),
        }
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> Result<usize, CacheError> {
        let now = Instant::now();
        let mut entries = self.write()?;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        Ok(before - entries.len())
    }

    /// Number of live entries.
    pub fn len(&self) -> Result<usize, CacheError> {
        let now = Instant::now();
        Ok(self.read()?.values().filter(|e| e.is_live(now)).count())
    }

    /// Whether the cache holds no live entries.
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, Entry>>, CacheError> {
        self.entries
            .read()
            .map_err(|_| CacheError::Poisoned)
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, Entry>>, CacheError> {
        self.entries
            .write()
            .map_err(|_| CacheError::Poisoned)
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = cache_key!("otp", user_id);
/// // Returns "otp:user123"
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_set_and_get() {
        let cache = Cache::new();
        cache.set("greeting", &"hello").unwrap();

        let value: Option<String> = cache.get("greeting").unwrap();
        assert_eq!(value.as_deref(), Some("hello"));
        assert!(cache.exists("greeting").unwrap());
    }

    #[test]
    fn test_missing_key() {
        let cache = Cache::new();
        let value: Option<u32> = cache.get("nothing").unwrap();
        assert!(value.is_none());
        assert!(!cache.delete("nothing").unwrap());
    }

    #[test]
    fn test_entry_expires() {
        let cache = Cache::new();
        cache
            .set_with_ttl("short", &1u32, Duration::from_millis(20))
            .unwrap();
        assert!(cache.exists("short").unwrap());

        sleep(Duration::from_millis(40));

        let value: Option<u32> = cache.get("short").unwrap();
        assert!(value.is_none());
        assert_eq!(cache.purge_expired().unwrap(), 1);
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn test_take_removes_entry() {
        let cache = Cache::new();
        cache.set("code", &123456u32).unwrap();

        let first: Option<u32> = cache.take("code").unwrap();
        let second: Option<u32> = cache.take("code").unwrap();
        assert_eq!(first, Some(123456));
        assert_eq!(second, None);
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = Cache::new();
        let other = cache.clone();
        cache.set("k", &true).unwrap();
        assert_eq!(other.get::<bool>("k").unwrap(), Some(true));
        assert_eq!(other.len().unwrap(), 1);
    }

    #[test]
    fn test_cache_key_macro() {
        let user = "u1";
        assert_eq!(cache_key!("otp", user), "otp:u1");
        assert_eq!(cache_key!("cart", user, 42), "cart:u1:42");
    }
}
