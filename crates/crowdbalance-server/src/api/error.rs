//! API error type and the mapping from domain errors to HTTP responses.
//!
//! Every failure leaves the server as `{ "success": false, "message",
//! "error"? }`. Store failures surface as a generic 500; the detail is
//! logged server-side only.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use crowdbalance_core::CoreError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Structured API error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                success: false,
                message: message.into(),
                error: None,
            },
        }
    }

    /// 400 for malformed or missing input.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, .. } => Self::new(
                StatusCode::NOT_FOUND,
                format!("{} not found", capitalize(&entity)),
            ),
            CoreError::AlreadyExists { entity } => Self::new(
                StatusCode::BAD_REQUEST,
                format!("{} name already exists", capitalize(&entity)),
            ),
            CoreError::Validation { message } | CoreError::InvalidOperation { message } => {
                Self::new(StatusCode::BAD_REQUEST, message)
            }
            CoreError::Database(detail) => {
                // Detail stays in the operational log; clients get a
                // generic message.
                tracing::error!(error = %detail, "store error while handling request");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
