//! Login sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_commerce::ids::UserId;
use std::time::Duration;

use crate::user::{Role, User};

/// Default session lifetime: 60 minutes.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// What a session remembers about its user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: UserId,
    pub email: String,
    pub user_name: String,
    pub role: Role,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            user_name: user.user_name.clone(),
            role: user.role,
        }
    }
}

/// An authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Opaque bearer token identifying the session.
    pub token: String,
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn user_id(&self) -> &UserId {
        &self.user.user_id
    }

    pub fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }

    /// Whether this session may act on resources owned by `owner`.
    ///
    /// Admins may act on anyone's resources.
    pub fn can_access(&self, owner: &UserId) -> bool {
        self.is_admin() || &self.user.user_id == owner
    }

    /// Check if session is expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Seconds until expiry, zero once expired.
    pub fn time_to_expiry(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> AuthSession {
        AuthSession {
            token: "tok".to_string(),
            user: SessionUser {
                user_id: UserId::new("u1"),
                email: "u1@example.com".to_string(),
                user_name: "U One".to_string(),
                role,
            },
            expires_at: Utc::now() + chrono::Duration::minutes(60),
        }
    }

    #[test]
    fn test_can_access_own_resources() {
        let session = session(Role::User);
        assert!(session.can_access(&UserId::new("u1")));
        assert!(!session.can_access(&UserId::new("u2")));
    }

    #[test]
    fn test_admin_can_access_anything() {
        let session = session(Role::Admin);
        assert!(session.is_admin());
        assert!(session.can_access(&UserId::new("u2")));
    }

    #[test]
    fn test_expiry() {
        let mut session = session(Role::User);
        assert!(!session.is_expired());
        assert!(session.time_to_expiry() > 3500);

        session.expires_at = Utc::now() - chrono::Duration::seconds(1);
        assert!(session.is_expired());
        assert_eq!(session.time_to_expiry(), 0);
    }
}
