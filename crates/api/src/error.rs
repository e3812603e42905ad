use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use snapdex_core::error::CoreError;
use snapdex_storage::StorageError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the uniform
/// `{"message": ..., "detail": ...}` error envelope; this is the single
/// boundary where typed failures become responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `snapdex_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A payload that failed field-level validation.
    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),

    /// An object-storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Client-facing message for anything uncaught. Internals never leak.
const INTERNAL_MESSAGE: &str = "Something went wrong";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    format!("{entity} with id {id} not found"),
                    Value::Null,
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), Value::Null),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), Value::Null),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, msg.clone(), Value::Null)
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone(), Value::Null),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        INTERNAL_MESSAGE.to_string(),
                        Value::Null,
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Field-level validation failures ---
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                serde_json::to_value(errors).unwrap_or(Value::Null),
            ),

            // --- Object storage ---
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Object storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_MESSAGE.to_string(),
                    Value::Null,
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), Value::Null),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_MESSAGE.to_string(),
                    Value::Null,
                )
            }
        };

        let body = json!({
            "message": message,
            "detail": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, message, and detail.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on `uq_`-named constraints map to 409.
/// - Foreign-key violations map to 404 (the referenced parent is gone).
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String, Value) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "Resource not found".to_string(),
            Value::Null,
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505.
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "This object already exists.".to_string(),
                        json!({ "constraint": constraint }),
                    );
                }
            }
            // Foreign-key violation: the dereferenced parent does not exist.
            if db_err.code().as_deref() == Some("23503") {
                return (
                    StatusCode::NOT_FOUND,
                    "Referenced resource not found".to_string(),
                    Value::Null,
                );
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_MESSAGE.to_string(),
                Value::Null,
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_MESSAGE.to_string(),
                Value::Null,
            )
        }
    }
}
