use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::result::DatabaseErrorKind;
use thiserror::Error;

use crate::api::ErrorResponse;

/// Failures surfaced by the storage layer, classified by cause.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    /// A database CHECK constraint rejected the row (e.g. rating out of
    /// range). Treated as a validation failure the request validation
    /// didn't catch first.
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// Unique or foreign-key violation not expected under normal operation.
    #[error("integrity error: {0}")]
    Integrity(String),

    #[error("database error: {0}")]
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for StoreError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => StoreError::NotFound,
            diesel::result::Error::DatabaseError(kind, info) => match kind {
                DatabaseErrorKind::CheckViolation => {
                    StoreError::Constraint(info.message().to_string())
                }
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::NotNullViolation => {
                    StoreError::Integrity(info.message().to_string())
                }
                _ => StoreError::Database(diesel::result::Error::DatabaseError(kind, info)),
            },
            other => StoreError::Database(other),
        }
    }
}

/// Error type returned by handlers; converts into the shared JSON error body.
///
/// Internal details are logged server-side and never sent to the client;
/// validation messages are passed through verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("database not available")]
    Unavailable,

    #[error("{0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ApiError::NotFound("Recipe not found".to_string()),
            StoreError::Constraint(msg) => ApiError::Validation(format!("Invalid field: {msg}")),
            StoreError::Integrity(msg) => ApiError::Internal(format!("integrity error: {msg}")),
            StoreError::Database(e) => ApiError::Internal(format!("database error: {e}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Database not available".to_string(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("request failed: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_store_not_found() {
        let err: StoreError = diesel::result::Error::NotFound.into();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn check_violation_is_a_constraint_error() {
        let db_err = diesel::result::Error::DatabaseError(
            DatabaseErrorKind::CheckViolation,
            Box::new("rating out of range".to_string()),
        );
        let err: StoreError = db_err.into();
        assert!(matches!(err, StoreError::Constraint(_)));

        // And a constraint failure surfaces to the client as a 400.
        assert!(matches!(
            ApiError::from(StoreError::Constraint("x".into())),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn unique_violation_is_an_integrity_error() {
        let db_err = diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_string()),
        );
        let err: StoreError = db_err.into();
        assert!(matches!(err, StoreError::Integrity(_)));
    }

    #[test]
    fn store_not_found_maps_to_404() {
        assert!(matches!(
            ApiError::from(StoreError::NotFound),
            ApiError::NotFound(_)
        ));
    }
}
