use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use solarbridge_notify::error::NotifyError;
use solarbridge_storage::error::StorageError;

const INTERNAL_MESSAGE: &str = "internal server error";

/// Unified API error type for all route handlers.
///
/// `Internal` carries a client-safe `message` and a `detail` that is only
/// logged. The client cannot tell storage failures from mail failures.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal {
        message: &'static str,
        detail: String,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn internal(detail: impl Into<String>) -> Self {
        ApiError::Internal {
            message: INTERNAL_MESSAGE,
            detail: detail.into(),
        }
    }

    /// Replace the client-facing message of an internal error.
    pub fn with_message(self, message: &'static str) -> Self {
        match self {
            ApiError::Internal { detail, .. } => ApiError::Internal { message, detail },
            other => other,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal { message, detail } => {
                tracing::error!("internal error: {detail}");
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Rejected(reason) => ApiError::BadRequest(reason.to_string()),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl From<NotifyError> for ApiError {
    fn from(e: NotifyError) -> Self {
        ApiError::internal(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
