//! API errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shop_auth::AuthError;
use shop_cache::CacheError;
use shop_commerce::CommerceError;
use shop_db::DbError;
use shop_payment::PaymentError;
use thiserror::Error;
use tracing::error;

/// Error returned by handlers.
///
/// Renders as `{ "success": false, "message": ... }` with the matching
/// status code. Internal details are logged, never sent.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorised user!".to_string())
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(detail) => {
                error!(error = %detail, "request failed");
                "Some error occurred".to_string()
            }
            other => other.to_string(),
        };
        let body = json!({ "success": false, "message": message });
        (self.status(), Json(body)).into_response()
    }
}

impl From<CommerceError> for ApiError {
    fn from(err: CommerceError) -> Self {
        match err {
            CommerceError::ProductNotFound(_) | CommerceError::ItemNotInCart(_) => {
                ApiError::NotFound(err.to_string())
            }
            CommerceError::AlreadyPaid(_) | CommerceError::TerminalOrderStatus { .. } => {
                ApiError::Conflict(err.to_string())
            }
            CommerceError::CurrencyMismatch { .. } | CommerceError::Overflow => {
                ApiError::Internal(err.to_string())
            }
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::SessionNotFound => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::UserNotFound(_) => ApiError::NotFound(err.to_string()),
            AuthError::UserAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            AuthError::InsufficientPermissions => ApiError::Forbidden(err.to_string()),
            AuthError::WeakPassword(_)
            | AuthError::Validation(_)
            | AuthError::OtpNotFound
            | AuthError::OtpExpired
            | AuthError::InvalidOtp => ApiError::BadRequest(err.to_string()),
            AuthError::Database(db) => db.into(),
            AuthError::Delivery(_) | AuthError::Cache(_) | AuthError::Internal(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidSignature | PaymentError::InvalidAmount(_) => {
                ApiError::BadRequest(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commerce_mapping() {
        let err: ApiError = CommerceError::ProductNotFound("p1".into()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = CommerceError::InsufficientStock {
            product_id: "p1".into(),
            size: None,
            requested: 3,
            available: 1,
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = CommerceError::AlreadyPaid("o1".into()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_auth_mapping() {
        let cases = [
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::SessionNotFound, StatusCode::UNAUTHORIZED),
            (AuthError::UserNotFound("a".into()), StatusCode::NOT_FOUND),
            (AuthError::UserAlreadyExists("a".into()), StatusCode::CONFLICT),
            (AuthError::OtpExpired, StatusCode::BAD_REQUEST),
            (AuthError::InsufficientPermissions, StatusCode::FORBIDDEN),
            (AuthError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_internal_detail_hidden() {
        let response = ApiError::Internal("disk on fire".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
