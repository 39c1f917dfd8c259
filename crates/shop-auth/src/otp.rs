//! One-time passcodes for email verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default passcode lifetime: 5 minutes.
pub const DEFAULT_OTP_TTL: Duration = Duration::from_secs(5 * 60);

/// Number of digits in a passcode.
pub const OTP_DIGITS: usize = 6;

/// Wrong guesses allowed before a passcode is discarded.
pub const MAX_OTP_ATTEMPTS: u32 = 5;

/// A passcode issued to an email address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpCode {
    /// The digits sent to the user.
    pub code: String,
    /// Address the code was sent to.
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Wrong guesses so far.
    #[serde(default)]
    pub attempts: u32,
}

impl OtpCode {
    /// Issue a fresh random code for `email` valid for `ttl`.
    pub fn generate(email: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        let lifetime = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::minutes(5));
        Self {
            code: generate_code(),
            email: email.into(),
            created_at: now,
            expires_at: now + lifetime,
            attempts: 0,
        }
    }

    /// Record a wrong guess. Returns `true` once no attempts remain.
    pub fn record_failure(&mut self) -> bool {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts >= MAX_OTP_ATTEMPTS
    }

    /// Time left until expiry, zero once expired.
    pub fn remaining(&self) -> Duration {
        (self.expires_at - Utc::now()).to_std().unwrap_or_default()
    }

    /// Check if code is expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Compare a submitted code in constant time.
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_compare(self.code.as_bytes(), candidate.trim().as_bytes())
    }

    /// Get cache key for the code issued to `email`.
    pub fn cache_key_for(email: &str) -> String {
        shop_cache::cache_key!("otp", email)
    }
}

/// Generate a uniformly random code of [`OTP_DIGITS`] digits, leading digit
/// non-zero.
fn generate_code() -> String {
    use rand::Rng;

    let low = 10u32.pow(OTP_DIGITS as u32 - 1);
    let high = 10u32.pow(OTP_DIGITS as u32);
    rand::thread_rng().gen_range(low..high).to_string()
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_format() {
        for _ in 0..50 {
            let otp = OtpCode::generate("a@example.com", DEFAULT_OTP_TTL);
            assert_eq!(otp.code.len(), OTP_DIGITS);
            assert!(otp.code.chars().all(|c| c.is_ascii_digit()));
            assert!(!otp.code.starts_with('0'));
        }
    }

    #[test]
    fn test_expiry_window() {
        let otp = OtpCode::generate("a@example.com", DEFAULT_OTP_TTL);
        assert!(!otp.is_expired());
        assert_eq!((otp.expires_at - otp.created_at).num_minutes(), 5);
    }

    #[test]
    fn test_matches() {
        let otp = OtpCode::generate("a@example.com", DEFAULT_OTP_TTL);
        let code = otp.code.clone();
        assert!(otp.matches(&code));
        assert!(otp.matches(&format!(" {code} ")));
        assert!(!otp.matches("12345"));
        assert!(!otp.matches("000000"));
    }

    #[test]
    fn test_attempts_run_out() {
        let mut otp = OtpCode::generate("a@example.com", DEFAULT_OTP_TTL);
        for _ in 1..MAX_OTP_ATTEMPTS {
            assert!(!otp.record_failure());
        }
        assert!(otp.record_failure());
        assert_eq!(otp.attempts, MAX_OTP_ATTEMPTS);
    }

    #[test]
    fn test_attempts_default_when_missing() {
        let json = r#"{"code":"123456","email":"a@example.com","created_at":"2026-01-01T00:00:00Z","expires_at":"2026-01-01T00:05:00Z"}"#;
        let otp: OtpCode = serde_json::from_str(json).unwrap();
        assert_eq!(otp.attempts, 0);
        assert_eq!(otp.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(OtpCode::cache_key_for("a@example.com"), "otp:a@example.com");
    }
}
