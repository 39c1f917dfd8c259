//! Passcode delivery.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::AuthError;

/// Transactional email endpoint used when none is configured.
pub const DEFAULT_MAIL_ENDPOINT: &str = "https://api.brevo.com/v3/smtp/email";

/// Delivers one-time passcodes to users.
#[async_trait]
pub trait OtpMailer: Send + Sync {
    /// Send `code` to `email`.
    async fn send_otp(&self, email: &str, code: &str) -> Result<(), AuthError>;
}

/// Delivers passcodes by writing them to the log.
///
/// Suitable for development and for deployments where an operator relays
/// codes by hand.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl OtpMailer for LogMailer {
    async fn send_otp(&self, email: &str, code: &str) -> Result<(), AuthError> {
        info!(email = %email, otp = %code, "one-time passcode issued");
        Ok(())
    }
}

/// Settings for [`HttpMailer`].
#[derive(Debug, Clone)]
pub struct HttpMailerConfig {
    /// URL the message is POSTed to.
    pub endpoint: String,
    /// Sent in the `api-key` header.
    pub api_key: String,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub timeout: Duration,
}

impl Default for HttpMailerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_MAIL_ENDPOINT.to_string(),
            api_key: String::new(),
            sender_name: "Storefront".to_string(),
            sender_email: String::new(),
            subject: "Your verification code".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Serialize)]
struct Mailbox<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutgoingMail<'a> {
    sender: Mailbox<'a>,
    to: [Mailbox<'a>; 1],
    subject: &'a str,
    text_content: String,
}

/// Sends passcodes as email through a transactional email HTTP API.
///
/// The request body follows the Brevo `smtp/email` shape: sender, a single
/// recipient, a subject, and a plain-text body.
pub struct HttpMailer {
    client: Client,
    config: HttpMailerConfig,
}

impl HttpMailer {
    pub fn new(config: HttpMailerConfig) -> Result<Self, AuthError> {
        if config.endpoint.trim().is_empty() {
            return Err(AuthError::Internal("mail endpoint not configured".to_string()));
        }
        if config.api_key.is_empty() || config.sender_email.trim().is_empty() {
            return Err(AuthError::Internal(
                "mail API key and sender email are required".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn message<'a>(&'a self, email: &'a str, code: &str) -> OutgoingMail<'a> {
        OutgoingMail {
            sender: Mailbox {
                name: Some(self.config.sender_name.as_str()).filter(|n| !n.is_empty()),
                email: &self.config.sender_email,
            },
            to: [Mailbox { name: None, email }],
            subject: &self.config.subject,
            text_content: format!(
                "Your verification code is {code}. It expires in a few minutes."
            ),
        }
    }
}

#[async_trait]
impl OtpMailer for HttpMailer {
    async fn send_otp(&self, email: &str, code: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("api-key", &self.config.api_key)
            .json(&self.message(email, code))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "mail API request failed");
                AuthError::Delivery(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "mail API rejected passcode email");
            return Err(AuthError::Delivery(format!("mail API returned {status}")));
        }
        debug!(email = %email, "passcode email accepted");
        Ok(())
    }
}

/// Keeps the last code sent to each address in memory.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<HashMap<String, String>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last code sent to `email`.
    pub fn last_code(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .ok()
            .and_then(|sent| sent.get(email).cloned())
    }
}

#[async_trait]
impl OtpMailer for RecordingMailer {
    async fn send_otp(&self, email: &str, code: &str) -> Result<(), AuthError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|e| AuthError::Delivery(e.to_string()))?;
        sent.insert(email.to_string(), code.to_string());
        Ok(())
    }
}
