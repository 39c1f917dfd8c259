//! User types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_commerce::ids::UserId;
use shop_db::Document;
use std::str::FromStr;

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer.
    #[default]
    User,
    /// Store administrator.
    Admin,
}

impl Role {
    /// Get role as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

/// A registered account as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub user_name: String,
    /// Lowercased, unique.
    pub email: String,
    #[serde(default)]
    pub mobile: Option<String>,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: Role,
    /// Set once the user proves control of the email with a passcode.
    #[serde(default)]
    pub is_otp_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new account.
    pub fn new(
        user_name: impl Into<String>,
        email: impl Into<String>,
        mobile: Option<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            user_name: user_name.into(),
            email: normalize_email(&email.into()),
            mobile,
            password_hash: password_hash.into(),
            role,
            is_otp_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Wire view without the password hash.
    pub fn public(&self) -> PublicUser {
        PublicUser::from(self)
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &str {
        self.id.as_str()
    }
}

/// The user fields exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub user_name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub role: Role,
    pub is_otp_verified: bool,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            user_name: user.user_name.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            role: user.role,
            is_otp_verified: user.is_otp_verified,
        }
    }
}

/// Canonical form of an email address for lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
