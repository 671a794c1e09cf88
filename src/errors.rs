use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};

/// Standardized error body returned by every handler.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Conflict", "Bad Request")
    pub error: String,
    /// Human-readable description naming the violated rule
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        sea_orm::error::DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Input violates a business rule (missing required comment above
    /// threshold, negative amount). Recoverable by correcting the input.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// An exclusivity invariant would be violated (duplicate open shift,
    /// duplicate transfer or reception). Not retryable without changing
    /// intent.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The aggregate is not in the state the operation requires (counting a
    /// closed opening, receiving a settled transfer). Indicates stale client
    /// state; refresh and re-evaluate rather than retry.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// Single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InvalidState(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Message suitable for HTTP responses. Internal errors return generic
    /// text to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::InternalError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Whether the failure came from the store rather than a business rule,
    /// so a single retry (with full invariant re-evaluation) is worthwhile.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
        )
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            details: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

/// Heuristic detection of unique-constraint violations across backends.
///
/// SQLx surfaces them differently per driver ("UNIQUE constraint failed" on
/// SQLite, "duplicate key value violates unique constraint" on Postgres);
/// the database constraint is the real guard for every "at most one X per Y"
/// invariant, so commands map this outcome to [`ServiceError::Conflict`].
pub fn is_unique_violation(err: &DbErr) -> bool {
    let text = err.to_string().to_ascii_lowercase();
    text.contains("unique constraint") || text.contains("duplicate key")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            ServiceError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::InvalidState("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn unique_violation_detection_covers_both_backends() {
        let sqlite = DbErr::Custom("UNIQUE constraint failed: shifts.open_scope".into());
        let postgres =
            DbErr::Custom("duplicate key value violates unique constraint \"uq_shifts\"".into());
        let other = DbErr::Custom("syntax error".into());
        assert!(is_unique_violation(&sqlite));
        assert!(is_unique_violation(&postgres));
        assert!(!is_unique_violation(&other));
    }
}
