use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dlife_core::alert::Alert;
use dlife_core::error::CoreError;
use dlife_db::DbError;
use dlife_search::SearchError;
use serde_json::json;

use crate::response::alert_headers;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and the storage and search errors of
/// the lower layers, and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `dlife_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage error from any repository.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// A search index error.
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A bad request that also carries failure alert headers.
    #[error("Bad request: {message}")]
    BadRequestAlert {
        app_name: String,
        entity: &'static str,
        error_key: &'static str,
        message: String,
    },

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Storage and search errors ---
            AppError::Database(err) => classify_db_error(err),
            AppError::Search(err) => {
                tracing::error!(error = %err, "Search index error");
                internal()
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::BadRequestAlert {
                app_name,
                entity,
                error_key,
                message,
            } => {
                let body = json!({
                    "error": message,
                    "code": "BAD_REQUEST",
                });
                let headers = alert_headers(
                    app_name,
                    Alert::Failure {
                        entity: *entity,
                        error_key: *error_key,
                    },
                );
                return (StatusCode::BAD_REQUEST, headers, axum::Json(body)).into_response();
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a storage error into an HTTP status, error code, and message.
///
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_db_error(err: &DbError) -> (StatusCode, &'static str, String) {
    if let Some(constraint) = err.unique_constraint() {
        if constraint.starts_with("uq_") {
            return (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Duplicate value violates unique constraint: {constraint}"),
            );
        }
    }
    tracing::error!(error = %err, "Database error");
    internal()
}
