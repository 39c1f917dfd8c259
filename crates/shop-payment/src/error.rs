//! Payment errors.

use thiserror::Error;

/// Payment error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    /// The gateway was asked to charge nothing.
    #[error("invalid payment amount: {0}")]
    InvalidAmount(i64),

    /// Gateway credentials are missing or unusable.
    #[error("payment gateway misconfigured: {0}")]
    Configuration(String),

    /// Signature did not verify.
    #[error("Invalid payment signature")]
    InvalidSignature,

    /// The gateway rejected the request.
    #[error("payment gateway error: {0}")]
    Gateway(String),
}
