//! Error responses for the HTTP surface.
//!
//! Domain errors implement [`IntoErrorResponse`] to pick their status
//! code, machine-readable code and logging severity; the JSON body format
//! is shared across all endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

/// Standard error body for all API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "hand_not_found")
    pub error: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn into_response(self, status: StatusCode) -> Response {
        reply::with_status(reply::json(&self), status).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Error classification for logging levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Client errors (4xx): expected during normal operation
    Client,
    /// Server errors (5xx): need investigation
    Server,
    /// Storage integrity at risk
    Critical,
}

/// Converts a domain error into an HTTP response, logging it on the way.
pub trait IntoErrorResponse {
    fn status_code(&self) -> StatusCode;

    fn error_code(&self) -> &'static str;

    fn error_message(&self) -> String;

    fn severity(&self) -> ErrorSeverity {
        if self.status_code().is_server_error() {
            ErrorSeverity::Server
        } else {
            ErrorSeverity::Client
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_code(), self.error_message())
    }

    fn into_http_response(self) -> Response
    where
        Self: Sized,
    {
        let status = self.status_code();
        let severity = self.severity();
        let error_response = self.to_error_response();

        match severity {
            ErrorSeverity::Client => {
                tracing::info!(code = %error_response.error, "client error: {}", error_response.message);
            }
            ErrorSeverity::Server => {
                tracing::error!(code = %error_response.error, "server error: {}", error_response.message);
            }
            ErrorSeverity::Critical => {
                tracing::error!(code = %error_response.error, "critical error: {}", error_response.message);
            }
        }

        error_response.into_response(status)
    }
}
