//! Expiring sessions stored in the [`Cache`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{Cache, CacheError};

/// A unique, unguessable session token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a session ID from an existing token string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new cryptographically secure session ID.
    ///
    /// 24 random bytes, URL-safe base64 without padding (32 chars).
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 24] = rand::thread_rng().gen();
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Get the session ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Session record stored in the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData<T> {
    /// The session ID.
    pub id: SessionId,
    /// User-defined session data.
    pub data: T,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session stops being valid.
    pub expires_at: DateTime<Utc>,
}

/// Session manager over a shared [`Cache`].
///
/// # Example
///
/// ```rust,ignore
/// use shop_cache::{Cache, Session};
/// use std::time::Duration;
///
/// let sessions = Session::<String>::new(Cache::new(), Duration::from_secs(3600));
/// let id = sessions.create(&"user-1".to_string())?;
/// assert_eq!(sessions.get(&id)?, Some("user-1".to_string()));
/// sessions.delete(&id)?;
/// ```
pub struct Session<T> {
    cache: Cache,
    ttl: Duration,
    _phantom: std::marker::PhantomData<fn() -> T>,
}

impl<T> Clone for Session<T> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            ttl: self.ttl,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> Session<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Create a session manager whose sessions live for `ttl`.
    pub fn new(cache: Cache, ttl: Duration) -> Self {
        Self {
            cache,
            ttl,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Session lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a new session holding `data`.
    pub fn create(&self, data: &T) -> Result<SessionId, CacheError> {
        let id = SessionId::generate();
        let now = Utc::now();
        let lifetime = chrono::Duration::from_std(self.ttl)
            .map_err(|e| CacheError::InvalidTtl(e.to_string()))?;

        let record = SessionData {
            id: id.clone(),
            data: data.clone(),
            created_at: now,
            expires_at: now + lifetime,
        };
        self.cache
            .set_with_ttl(&Self::session_key(&id), &record, self.ttl)?;
        tracing::debug!(session = %id, "session created");
        Ok(id)
    }

    /// Get session data if the session exists and has not expired.
    pub fn get(&self, id: &SessionId) -> Result<Option<T>, CacheError> {
        Ok(self.get_record(id)?.map(|record| record.data))
    }

    /// Get the full session record.
    pub fn get_record(&self, id: &SessionId) -> Result<Option<SessionData<T>>, CacheError> {
        self.cache.get(&Self::session_key(id))
    }

    /// End a session. Returns whether it was live.
    pub fn delete(&self, id: &SessionId) -> Result<bool, CacheError> {
        self.cache.delete(&Self::session_key(id))
    }

    /// Check if a session exists.
    pub fn exists(&self, id: &SessionId) -> Result<bool, CacheError> {
        self.cache.exists(&Self::session_key(id))
    }

    fn session_key(id: &SessionId) -> String {
        crate::cache_key!("session", id)
    }
}
