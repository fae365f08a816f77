use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use carousel_core::error::CoreError;
use carousel_gateway::GatewayError;
use carousel_pipeline::PipelineError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps domain and pipeline errors and implements [`IntoResponse`] to
/// produce the `{ "error": string }` JSON bodies clients expect.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `carousel_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A pipeline stage failure.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::Unauthorized => {
                    (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
                }
                CoreError::Upstream { status, message } => {
                    tracing::error!(upstream_status = status, error = %message, "Upstream error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Upstream error ({status}): {message}"),
                    )
                }
                CoreError::Extraction(msg) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("No parseable JSON object in model response: {msg}"),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::Pipeline(pipeline) => match pipeline {
                PipelineError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    format!("{entity} with id {id} not found"),
                ),
                PipelineError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                PipelineError::Gateway(err) => classify_gateway_error(err),
                PipelineError::RateLimited(msg) => {
                    (StatusCode::TOO_MANY_REQUESTS, msg.clone())
                }
                PipelineError::Storage(err) => {
                    tracing::error!(error = %err, "Storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal error occurred".to_string(),
                    )
                }
                PipelineError::Database(err) => classify_sqlx_error(err),
                PipelineError::Extraction { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, pipeline.to_string())
                }
                PipelineError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal pipeline error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

/// Map a gateway failure to a 500, carrying the upstream status in the
/// message when the gateway answered at all. Rate limits only pass through
/// as 429 where a stage raises [`PipelineError::RateLimited`].
fn classify_gateway_error(err: &GatewayError) -> (StatusCode, String) {
    match err.status() {
        Some(status) => {
            tracing::error!(upstream_status = status, error = %err, "Upstream error");
        }
        None => {
            tracing::error!(error = %err, "Gateway request error");
        }
    }
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

/// Classify a sqlx error into an HTTP status and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            )
        }
    }
}
