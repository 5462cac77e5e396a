//! HTTP error mapping.

use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::error;

/// Errors returned by handlers, rendered as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    /// Store, filesystem, or other server-side failure.
    Internal(notebox_core::Error),
    NotFound(String),
    BadRequest(String),
    PayloadTooLarge(String),
}

impl From<notebox_core::Error> for ApiError {
    fn from(err: notebox_core::Error) -> Self {
        use notebox_core::Error;

        match err {
            Error::NoteNotFound(_) => ApiError::NotFound("Note not found".to_string()),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::PayloadTooLarge(msg) => ApiError::PayloadTooLarge(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal(err) => {
                error!(subsystem = "api", error = %err, "Request failed");
                "Internal server error".to_string()
            }
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::PayloadTooLarge(msg) => {
                msg
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
