use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cytomine_core::error::CoreError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers and services.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the JSON error envelope
/// `{ "error", "code", "values" }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cytomine_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler and service return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Shorthand for a missing domain object.
    pub fn not_found(entity: &'static str, id: cytomine_core::types::DbId) -> Self {
        AppError::Core(CoreError::NotFound { entity, id })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut values = json!({});
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => {
                values = core.values();
                match core {
                    CoreError::NotFound { entity, id } => (
                        StatusCode::NOT_FOUND,
                        "NOT_FOUND",
                        format!("{entity} with id {id} not found"),
                    ),
                    CoreError::Validation(msg) => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                    }
                    CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                    CoreError::Constraint(msg) => {
                        (StatusCode::BAD_REQUEST, "CONSTRAINT", msg.clone())
                    }
                    CoreError::Unauthorized(msg) => {
                        (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                    }
                    CoreError::Forbidden(msg) => {
                        (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
                    }
                    CoreError::Internal(msg) => {
                        tracing::error!(error = %msg, "Internal core error");
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "INTERNAL_ERROR",
                            "An internal error occurred".to_string(),
                        )
                    }
                }
            }

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, axum::Json(envelope(message, code, values))).into_response()
    }
}

fn envelope(message: String, code: &str, values: Value) -> Value {
    json!({
        "error": message,
        "code": code,
        "values": values,
    })
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Foreign key violations map to 400 `CONSTRAINT`.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                // PostgreSQL unique_violation
                Some("23505") if constraint.starts_with("uq_") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
                // PostgreSQL foreign_key_violation
                Some("23503") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "CONSTRAINT",
                        format!("Operation violates foreign key constraint: {constraint}"),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
