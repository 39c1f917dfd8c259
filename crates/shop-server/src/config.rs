//! Server configuration.
//!
//! Loaded from a TOML file, then overridden from the environment. Every
//! section and field has a default, so an empty file is a valid config.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use shop_auth::{
    HttpMailer, HttpMailerConfig, LogMailer, OtpMailer, DEFAULT_MAIL_ENDPOINT,
    MIN_PASSWORD_LENGTH,
};
use shop_commerce::Currency;
use shop_db::{StorageBackend, StorageConfig};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SHOP_CONFIG";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub payment: PaymentConfig,

    #[serde(default)]
    pub mail: MailConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl ShopConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    /// Parse config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the config: the explicit path, else `SHOP_CONFIG`, else
    /// defaults. Environment overrides are applied last.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: {port}"))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.backend = StorageBackend::Sqlite;
            self.storage.url = url;
        }
        if let Some(key_id) = lookup("PAYMENT_KEY_ID") {
            self.payment.key_id = key_id;
        }
        if let Some(secret) = lookup("PAYMENT_KEY_SECRET") {
            self.payment.key_secret = secret;
        }
        if let Some(key) = lookup("MAIL_API_KEY") {
            self.mail.backend = MailBackend::Http;
            self.mail.api_key = key;
        }
        if let Some(sender) = lookup("MAIL_SENDER_EMAIL") {
            self.mail.sender_email = sender;
        }
        if let Some(email) = lookup("SHOP_ADMIN_EMAIL") {
            let admin = self.auth.admin.get_or_insert_with(AdminBootstrap::default);
            admin.email = email;
        }
        if let Some(password) = lookup("SHOP_ADMIN_PASSWORD") {
            let admin = self.auth.admin.get_or_insert_with(AdminBootstrap::default);
            admin.password = password;
        }
        Ok(())
    }

    /// Check the config for values the server cannot start with.
    pub fn validate(&self) -> Result<()> {
        for origin in &self.server.cors_origins {
            if origin != "*" && HeaderValue::from_str(origin).is_err() {
                bail!("server.cors_origins: invalid origin {origin:?}");
            }
        }
        if self.server.body_limit_bytes == 0 {
            bail!("server.body_limit_bytes must be greater than zero");
        }
        if self.auth.session_ttl_secs == 0 || self.auth.otp_ttl_secs == 0 {
            bail!("auth.session_ttl_secs and auth.otp_ttl_secs must be greater than zero");
        }
        if self.auth.cookie_name.trim().is_empty() {
            bail!("auth.cookie_name must not be empty");
        }
        if let Some(admin) = &self.auth.admin {
            if admin.email.trim().is_empty() {
                bail!("auth.admin.email is required when an admin is configured");
            }
            if admin.password.len() < MIN_PASSWORD_LENGTH {
                bail!("auth.admin.password must be at least {MIN_PASSWORD_LENGTH} characters");
            }
        }
        if self.payment.key_secret.is_empty() {
            bail!("payment.key_secret is required (or set PAYMENT_KEY_SECRET)");
        }
        self.payment.currency()?;
        if self.mail.backend == MailBackend::Http {
            if self.mail.api_key.is_empty() {
                bail!("mail.api_key is required for the http backend (or set MAIL_API_KEY)");
            }
            if self.mail.sender_email.trim().is_empty() {
                bail!("mail.sender_email is required for the http backend");
            }
            if self.mail.timeout_secs == 0 {
                bail!("mail.timeout_secs must be greater than zero");
            }
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call the API with credentials. `*` allows any
    /// origin without credentials.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Directory uploaded images are written to and served from.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Prefix for uploaded image URLs, e.g. `https://shop.example.com`.
    #[serde(default)]
    pub public_base_url: Option<String>,

    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_body_limit() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            upload_dir: default_upload_dir(),
            public_base_url: None,
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl ServerConfig {
    /// Socket address to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Public URL of an uploaded file.
    pub fn upload_url(&self, file_name: &str) -> String {
        let base = self
            .public_base_url
            .as_deref()
            .unwrap_or("")
            .trim_end_matches('/');
        format!("{base}/uploads/{file_name}")
    }
}

/// Session, passcode, and cookie settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    #[serde(default = "default_otp_ttl")]
    pub otp_ttl_secs: u64,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Mark the session cookie `Secure`.
    #[serde(default)]
    pub cookie_secure: bool,

    /// Admin account created at startup if missing.
    #[serde(default)]
    pub admin: Option<AdminBootstrap>,
}

fn default_session_ttl() -> u64 {
    60 * 60
}

fn default_otp_ttl() -> u64 {
    5 * 60
}

fn default_cookie_name() -> String {
    "token".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: default_session_ttl(),
            otp_ttl_secs: default_otp_ttl(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
            admin: None,
        }
    }
}

impl AuthConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn otp_ttl(&self) -> Duration {
        Duration::from_secs(self.otp_ttl_secs)
    }
}

/// Bootstrap admin credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminBootstrap {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_admin_name")]
    pub user_name: String,
}

fn default_admin_name() -> String {
    "Admin".to_string()
}

/// Payment gateway credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Public key id handed to checkout clients.
    #[serde(default = "default_key_id")]
    pub key_id: String,

    #[serde(default)]
    pub key_secret: String,

    /// ISO code of the store currency.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_key_id() -> String {
    "rzp_test_key".to_string()
}

fn default_currency() -> String {
    "INR".to_string()
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            key_id: default_key_id(),
            key_secret: String::new(),
            currency: default_currency(),
        }
    }
}

impl PaymentConfig {
    /// The configured store currency.
    pub fn currency(&self) -> Result<Currency> {
        match Currency::from_code(&self.currency) {
            Some(currency) => Ok(currency),
            None => bail!("payment.currency: unsupported currency {:?}", self.currency),
        }
    }
}

/// How passcodes reach users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailBackend {
    /// Write codes to the log. Development only.
    #[default]
    Log,
    /// Send email through a transactional email HTTP API.
    Http,
}

/// Passcode email settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub backend: MailBackend,

    #[serde(default = "default_mail_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    #[serde(default)]
    pub sender_email: String,

    #[serde(default = "default_mail_subject")]
    pub subject: String,

    #[serde(default = "default_mail_timeout")]
    pub timeout_secs: u64,
}

fn default_mail_endpoint() -> String {
    DEFAULT_MAIL_ENDPOINT.to_string()
}

fn default_sender_name() -> String {
    "Storefront".to_string()
}

fn default_mail_subject() -> String {
    "Your verification code".to_string()
}

fn default_mail_timeout() -> u64 {
    10
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            backend: MailBackend::default(),
            endpoint: default_mail_endpoint(),
            api_key: String::new(),
            sender_name: default_sender_name(),
            sender_email: String::new(),
            subject: default_mail_subject(),
            timeout_secs: default_mail_timeout(),
        }
    }
}

impl MailConfig {
    /// Build the configured passcode mailer.
    pub fn mailer(&self) -> Result<Arc<dyn OtpMailer>> {
        Ok(match self.backend {
            MailBackend::Log => Arc::new(LogMailer),
            MailBackend::Http => Arc::new(HttpMailer::new(HttpMailerConfig {
                endpoint: self.endpoint.clone(),
                api_key: self.api_key.clone(),
                sender_name: self.sender_name.clone(),
                sender_email: self.sender_email.clone(),
                subject: self.subject.clone(),
                timeout: Duration::from_secs(self.timeout_secs),
            })?),
        })
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `SHOP_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "info,tower_http=debug".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid() -> ShopConfig {
        let mut config = ShopConfig::default();
        config.payment.key_secret = "secret".to_string();
        config
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ShopConfig::from_toml("").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.cookie_name, "token");
        assert_eq!(config.auth.session_ttl(), Duration::from_secs(3600));
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(!config.log.json);
    }

    #[test]
    fn test_parse_sections() {
        let config = ShopConfig::from_toml(
            r#"
            [server]
            port = 8080
            cors_origins = ["https://shop.example.com"]
            public_base_url = "https://cdn.example.com/"

            [storage]
            backend = "sqlite"
            url = "sqlite://data/shop.db?mode=rwc"

            [auth]
            otp_ttl_secs = 120
            cookie_secure = true

            [auth.admin]
            email = "admin@example.com"
            password = "changeme"

            [payment]
            key_secret = "s3cret"
            currency = "usd"

            [log]
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.auth.otp_ttl(), Duration::from_secs(120));
        assert!(config.auth.cookie_secure);
        let admin = config.auth.admin.as_ref().unwrap();
        assert_eq!(admin.user_name, "Admin");
        assert_eq!(config.payment.currency().unwrap(), Currency::USD);
        assert_eq!(
            config.server.upload_url("a.png"),
            "https://cdn.example.com/uploads/a.png"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PORT", "9000"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("PAYMENT_KEY_SECRET", "from-env"),
            ("SHOP_ADMIN_EMAIL", "root@example.com"),
            ("SHOP_ADMIN_PASSWORD", "rootpass"),
        ]
        .into_iter()
        .collect();

        let mut config = ShopConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.url, "sqlite::memory:");
        assert_eq!(config.payment.key_secret, "from-env");
        let admin = config.auth.admin.as_ref().unwrap();
        assert_eq!(admin.email, "root@example.com");
        assert_eq!(admin.password, "rootpass");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = ShopConfig::default();
        let result = config.apply_overrides(|key| (key == "PORT").then(|| "http".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ShopConfig::default().validate().is_err());

        let mut config = valid();
        config.payment.currency = "XYZ".to_string();
        assert!(config.validate().is_err());

        let mut config = valid();
        config.auth.admin = Some(AdminBootstrap {
            email: "admin@example.com".to_string(),
            password: "123".to_string(),
            user_name: "Admin".to_string(),
        });
        assert!(config.validate().is_err());

        let mut config = valid();
        config.server.cors_origins = vec!["bad\norigin".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mail_section() {
        let config = ShopConfig::from_toml("").unwrap();
        assert_eq!(config.mail.backend, MailBackend::Log);
        assert!(config.mail.mailer().is_ok());

        let mut config = ShopConfig::from_toml(
            r#"
            [payment]
            key_secret = "s3cret"

            [mail]
            backend = "http"
            sender_email = "no-reply@shop.example"
            "#,
        )
        .unwrap();
        assert_eq!(config.mail.endpoint, DEFAULT_MAIL_ENDPOINT);
        assert_eq!(config.mail.timeout_secs, 10);
        assert!(config.validate().is_err());

        config
            .apply_overrides(|key| (key == "MAIL_API_KEY").then(|| "key".to_string()))
            .unwrap();
        assert!(config.validate().is_ok());
        assert!(config.mail.mailer().is_ok());
    }

    #[test]
    fn test_mail_api_key_selects_http_backend() {
        let mut config = valid();
        config
            .apply_overrides(|key| match key {
                "MAIL_API_KEY" => Some("key".to_string()),
                "MAIL_SENDER_EMAIL" => Some("otp@shop.example".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.mail.backend, MailBackend::Http);
        assert_eq!(config.mail.sender_email, "otp@shop.example");
        assert!(config.validate().is_ok());

        config.mail.sender_email.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_upload_url_without_base() {
        let config = ServerConfig::default();
        assert_eq!(config.upload_url("x.jpg"), "/uploads/x.jpg");
    }
}
