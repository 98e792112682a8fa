/// Error types for feed-service
///
/// Errors are converted to a uniform JSON failure shape for API clients:
/// a generic user-facing message plus, in debug builds only, the internal
/// detail.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;
use uuid::Uuid;

/// Result type for feed-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Request input failed validation (bad limit, malformed cursor, ...)
    Validation(String),

    /// The post a cursor points at no longer exists. Feed reads treat this
    /// as end-of-feed; it only surfaces as an error on non-feed paths.
    CursorNotFound(Uuid),

    /// Resource not found
    NotFound(String),

    /// Database operation failed
    Database(String),

    /// Cache operation failed
    Cache(String),

    /// Missing or unusable gateway identity
    Unauthorized(String),

    /// Authenticated, but not allowed to touch this resource
    Forbidden(String),

    /// Bad request
    BadRequest(String),

    /// Internal server error
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::CursorNotFound(id) => write!(f, "Cursor post not found: {}", id),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Cache(msg) => write!(f, "Cache error: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    /// Generic message safe to show any caller.
    fn public_message(&self) -> &str {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => "Invalid request",
            AppError::CursorNotFound(_) | AppError::NotFound(_) => "Resource not found",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::Database(_) | AppError::Cache(_) | AppError::Internal(_) => {
                "An error occurred"
            }
        }
    }

    /// Validation-class errors carry their detail to the caller; internal
    /// failures never do outside debug builds.
    fn detail_is_public(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::NotFound(_)
        )
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::CursorNotFound(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Database(_) | AppError::Cache(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let detail = if self.detail_is_public() || cfg!(debug_assertions) {
            self.to_string()
        } else {
            "An error occurred".to_string()
        };

        HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "message": self.public_message(),
            "error": detail,
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<pulse_cache::CacheError> for AppError {
    fn from(err: pulse_cache::CacheError) -> Self {
        AppError::Cache(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("limit".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::CursorNotFound(Uuid::nil()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_stays_generic() {
        let err = AppError::Database("password in dsn".into());
        assert_eq!(err.public_message(), "An error occurred");
        assert!(!err.detail_is_public());
    }

    #[test]
    fn test_validation_detail_is_public() {
        let err = AppError::Validation("limit must be between 1 and 50".into());
        assert!(err.detail_is_public());
    }
}
