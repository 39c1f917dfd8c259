//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Invalid credentials provided.
    #[error("Incorrect password! Please try again")]
    InvalidCredentials,

    /// User not found.
    #[error("User doesn't exist: {0}")]
    UserNotFound(String),

    /// User already exists.
    #[error("User already exists with the same email: {0}")]
    UserAlreadyExists(String),

    /// Session not found or expired.
    #[error("session not found or expired")]
    SessionNotFound,

    /// Password too weak.
    #[error("password too weak: {0}")]
    WeakPassword(String),

    /// Malformed request input.
    #[error("{0}")]
    Validation(String),

    /// No passcode was issued for the email, or it was already used.
    #[error("OTP not found or already used")]
    OtpNotFound,

    /// Passcode expired.
    #[error("OTP expired. Please request a new one")]
    OtpExpired,

    /// Passcode does not match.
    #[error("Invalid OTP")]
    InvalidOtp,

    /// Insufficient permissions.
    #[error("insufficient permissions")]
    InsufficientPermissions,

    /// Passcode delivery failed.
    #[error("failed to deliver OTP: {0}")]
    Delivery(String),

    /// Cache error.
    #[error("cache error: {0}")]
    Cache(#[from] shop_cache::CacheError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] shop_db::DbError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AuthError::InvalidCredentials | AuthError::SessionNotFound)
    }

    /// Check if this is a permission error.
    pub fn is_permission_error(&self) -> bool {
        matches!(self, AuthError::InsufficientPermissions)
    }

    /// Check if this is a problem with the submitted passcode.
    pub fn is_otp_error(&self) -> bool {
        matches!(
            self,
            AuthError::OtpNotFound | AuthError::OtpExpired | AuthError::InvalidOtp
        )
    }
}
