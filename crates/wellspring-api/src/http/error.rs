//! Application error type mapping to HTTP status codes.
//!
//! Validation failures map to 400; dependency failures (completion
//! provider, persistence store) map to 502 with a stable, non-leaking
//! detail string. Internal error detail is logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use wellspring_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat flow errors (validation, upstream, persistence).
    Chat(ChatError),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    /// Status code, machine-readable code, and safe message for this error.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(ChatError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::Upstream(_)) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "AI service error".to_string(),
            ),
            // Covers both reads and writes against the store, so the
            // detail stays neutral about the direction.
            AppError::Chat(ChatError::Persistence(_)) => (
                StatusCode::BAD_GATEWAY,
                "PERSISTENCE_ERROR",
                "Chat storage unavailable".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        // Full detail goes to the log; the response carries only the
        // stable message.
        match &self {
            AppError::Chat(ChatError::Validation(_)) => {}
            AppError::Chat(err) => error!(error = %err, "request failed"),
        }

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
