use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use intake_cloud::UploadError;
use intake_core::error::CoreError;

use crate::response::{MessageResponse, MSG_SERVER_ERROR};

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, persistence and upload errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce `{ "message": ... }`
/// bodies: validation problems are echoed back as 400s, everything else
/// is logged and collapsed into a generic 500.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `intake_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The asset store failed to take a screenshot.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// A malformed request body.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),

            AppError::Core(core) => {
                tracing::error!(error = %core, "Registration could not be built");
                server_error()
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                server_error()
            }
            AppError::Upload(err) => {
                tracing::error!(error = %err, "Screenshot upload failed");
                server_error()
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                server_error()
            }
        };

        (status, axum::Json(MessageResponse::new(message))).into_response()
    }
}

fn server_error() -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, MSG_SERVER_ERROR.to_string())
}
