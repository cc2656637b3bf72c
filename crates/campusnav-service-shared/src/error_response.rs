//! JSON error bodies returned by the routing endpoints.
//!
//! Every failure is mapped exactly once, at the handler, to a status code and
//! a body of the form `{ "error": "...", "request_id": "..." }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use campusnav_lib::Error as LibError;

/// Error body sent to clients.
///
/// # Example
///
/// ```
/// use campusnav_service_shared::ErrorResponse;
///
/// let body = ErrorResponse::bad_request("unsupported profile: hovercraft")
///     .with_request_id("0192f5c4-7b7e-7000-8000-000000000000");
/// assert_eq!(body.status().as_u16(), 400);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description of what went wrong.
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    #[serde(skip, default = "default_status")]
    status: u16,
}

fn default_status() -> u16 {
    StatusCode::INTERNAL_SERVER_ERROR.as_u16()
}

impl ErrorResponse {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            request_id: None,
            status: status.as_u16(),
        }
    }

    /// Attach the request identifier for correlation with logs.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// 400 for malformed input.
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// 500 for provider and pipeline failures.
    pub fn internal_error(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.error)
    }
}

impl std::error::Error for ErrorResponse {}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Convert a library error into a client-facing body.
///
/// Validation failures are the caller's fault (400); everything else is
/// reported as a server error (500) carrying the library's message.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ErrorResponse {
    let response = if error.is_client_error() {
        ErrorResponse::bad_request(error.to_string())
    } else {
        ErrorResponse::internal_error(error.to_string())
    };
    response.with_request_id(request_id)
}
