//! Accounts and authentication for the storefront.
//!
//! Provides argon2 password hashing, cache-backed login sessions, email
//! passcodes, and the [`AuthService`] that ties them to the user store.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_auth::prelude::*;
//!
//! let auth = AuthService::new(store, cache, Arc::new(LogMailer), AuthSettings::default());
//! auth.register(&RegisterRequest { /* ... */ }).await?;
//! let (session, user) = auth.login("asha@example.com", "secret1").await?;
//! ```

mod error;
mod mailer;
mod otp;
mod password;
mod service;
mod session;
mod user;

pub use error::AuthError;
pub use mailer::{
    HttpMailer, HttpMailerConfig, LogMailer, OtpMailer, RecordingMailer, DEFAULT_MAIL_ENDPOINT,
};
pub use otp::{OtpCode, DEFAULT_OTP_TTL, MAX_OTP_ATTEMPTS, OTP_DIGITS};
pub use password::{PasswordHasher, MIN_PASSWORD_LENGTH};
pub use service::{AuthService, AuthSettings, RegisterRequest};
pub use session::{AuthSession, SessionUser, DEFAULT_SESSION_TTL};
pub use user::{normalize_email, PublicUser, Role, User};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        AuthError, AuthService, AuthSession, AuthSettings, LogMailer, OtpMailer, PublicUser,
        RegisterRequest, Role, SessionUser, User,
    };
}
