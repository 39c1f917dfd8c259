//! Account, session, and passcode workflows.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shop_cache::{Cache, Session, SessionId};
use shop_db::{Collection, DocumentStore};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::mailer::OtpMailer;
use crate::otp::{OtpCode, DEFAULT_OTP_TTL};
use crate::password::PasswordHasher;
use crate::session::{AuthSession, SessionUser, DEFAULT_SESSION_TTL};
use crate::user::{normalize_email, PublicUser, Role, User};
use crate::AuthError;

/// Expired passcodes stay readable this long so late attempts are told the
/// code expired rather than that none exists.
const OTP_RETENTION: Duration = Duration::from_secs(10 * 60);

/// Lifetimes used by [`AuthService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSettings {
    pub session_ttl: Duration,
    pub otp_ttl: Duration,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl: DEFAULT_SESSION_TTL,
            otp_ttl: DEFAULT_OTP_TTL,
        }
    }
}

/// Registration form.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub mobile: Option<String>,
}

/// Users, login sessions, and email passcodes.
pub struct AuthService {
    users: Collection<User>,
    sessions: Session<SessionUser>,
    cache: Cache,
    hasher: PasswordHasher,
    mailer: Arc<dyn OtpMailer>,
    settings: AuthSettings,
    // Serializes the duplicate-email check with the insert.
    registration: Mutex<()>,
    // Serializes reading and updating a passcode's attempt count.
    otp_checks: Mutex<()>,
}

impl AuthService {
    /// Create the service over a document store and a cache.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cache: Cache,
        mailer: Arc<dyn OtpMailer>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            users: Collection::new(store),
            sessions: Session::new(cache.clone(), settings.session_ttl),
            cache,
            hasher: PasswordHasher::default(),
            mailer,
            settings,
            registration: Mutex::new(()),
            otp_checks: Mutex::new(()),
        }
    }

    /// Replace the password hasher.
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Register a customer account.
    pub async fn register(&self, request: &RegisterRequest) -> Result<PublicUser, AuthError> {
        let mobile = request
            .mobile
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        let user = self
            .create_user(
                &request.user_name,
                &request.email,
                &request.password,
                mobile,
                Role::User,
            )
            .await?;
        info!(user_id = %user.id, "user registered");
        Ok(user.public())
    }

    async fn create_user(
        &self,
        user_name: &str,
        email: &str,
        password: &str,
        mobile: Option<String>,
        role: Role,
    ) -> Result<User, AuthError> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(AuthError::Validation("userName is required".to_string()));
        }
        let email = validate_email(email)?;
        PasswordHasher::validate_password(password)?;

        let _guard = self.registration.lock().await;
        if self.find_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists(email));
        }

        let hash = self.hasher.hash(password)?;
        let user = User::new(user_name, email, mobile, hash, role);
        self.users.insert(&user).await?;
        Ok(user)
    }

    /// Check credentials and open a session.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(AuthSession, PublicUser), AuthError> {
        let email = normalize_email(email);
        let user = self
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(email.clone()))?;

        if !self.hasher.verify(password, &user.password_hash)? {
            warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.open_session(&user)?;
        info!(user_id = %user.id, role = user.role.as_str(), "user logged in");
        Ok((session, user.public()))
    }

    fn open_session(&self, user: &User) -> Result<AuthSession, AuthError> {
        let data = SessionUser::from(user);
        let token = self.sessions.create(&data)?;
        let lifetime = chrono::Duration::from_std(self.settings.session_ttl)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(AuthSession {
            token: token.to_string(),
            user: data,
            expires_at: Utc::now() + lifetime,
        })
    }

    /// End a session. Unknown tokens are ignored.
    pub fn logout(&self, token: &str) -> Result<(), AuthError> {
        if self.sessions.delete(&SessionId::from(token))? {
            debug!("session closed");
        }
        Ok(())
    }

    /// Resolve a live session from its token.
    pub fn authenticate(&self, token: &str) -> Result<AuthSession, AuthError> {
        let record = self
            .sessions
            .get_record(&SessionId::from(token))?
            .ok_or(AuthError::SessionNotFound)?;
        Ok(AuthSession {
            token: token.to_string(),
            user: record.data,
            expires_at: record.expires_at,
        })
    }

    /// Current stored view of the session's user.
    pub async fn current_user(&self, session: &AuthSession) -> Result<PublicUser, AuthError> {
        self.users
            .get(session.user_id().as_str())
            .await?
            .map(|user| user.public())
            .ok_or(AuthError::SessionNotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self.users.find_one(|u| u.email == email).await?)
    }

    /// Issue a passcode to `email`, replacing any earlier one.
    pub async fn send_otp(&self, email: &str) -> Result<(), AuthError> {
        let email = validate_email(email)?;
        let otp = OtpCode::generate(email.clone(), self.settings.otp_ttl);
        self.cache.set_with_ttl(
            &OtpCode::cache_key_for(&email),
            &otp,
            self.settings.otp_ttl + OTP_RETENTION,
        )?;
        self.mailer.send_otp(&email, &otp.code).await?;
        debug!(email = %email, "passcode sent");
        Ok(())
    }

    /// Check a passcode. A correct code is consumed and marks the matching
    /// account, if any, as verified.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), AuthError> {
        let email = normalize_email(email);
        if email.is_empty() || otp.trim().is_empty() {
            return Err(AuthError::Validation(
                "Email and OTP are required".to_string(),
            ));
        }

        let key = OtpCode::cache_key_for(&email);
        let guard = self.otp_checks.lock().await;
        let mut issued: OtpCode = self.cache.get(&key)?.ok_or(AuthError::OtpNotFound)?;

        if issued.is_expired() {
            self.cache.delete(&key)?;
            return Err(AuthError::OtpExpired);
        }
        if !issued.matches(otp) {
            if issued.record_failure() {
                self.cache.delete(&key)?;
                warn!(
                    email = %email,
                    attempts = issued.attempts,
                    "passcode discarded after failed attempts"
                );
            } else {
                self.cache
                    .set_with_ttl(&key, &issued, issued.remaining() + OTP_RETENTION)?;
            }
            return Err(AuthError::InvalidOtp);
        }
        self.cache.delete(&key)?;
        drop(guard);

        if let Some(mut user) = self.find_by_email(&email).await? {
            user.is_otp_verified = true;
            user.updated_at = Utc::now();
            self.users.save(&user).await?;
            info!(user_id = %user.id, "email verified");
        }
        Ok(())
    }

    /// Make sure an admin account exists for `email`.
    ///
    /// Creates it when missing and promotes an existing account otherwise.
    /// The password of an existing account is left alone.
    pub async fn ensure_admin(
        &self,
        email: &str,
        password: &str,
        user_name: &str,
    ) -> Result<PublicUser, AuthError> {
        let email = validate_email(email)?;
        if let Some(mut user) = self.find_by_email(&email).await? {
            if !user.role.is_admin() {
                user.role = Role::Admin;
                user.updated_at = Utc::now();
                self.users.save(&user).await?;
                info!(user_id = %user.id, "existing account promoted to admin");
            }
            return Ok(user.public());
        }

        let user = self
            .create_user(user_name, &email, password, None, Role::Admin)
            .await?;
        info!(user_id = %user.id, "admin account created");
        Ok(user.public())
    }
}

fn validate_email(email: &str) -> Result<String, AuthError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AuthError::Validation("Email is required".to_string()));
    }
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid {
        return Err(AuthError::Validation(format!("Invalid email: {email}")));
    }
    Ok(email)
}
