//! Error types for the timetracker cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Tracker Error Enum ==
/// Unified error type for the cache and its upstream client.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Transport-level failure talking to the upstream (connect, timeout)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Caller supplied data that cannot be processed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upstream answered with a non-success status
    #[error("Upstream rejected request with status {0}")]
    UpstreamRejected(u16),

    /// Anything else
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl TrackerError {
    /// Returns true for transport-level failures.
    pub fn is_connection(&self) -> bool {
        matches!(self, TrackerError::Connection(_))
    }
}

impl From<reqwest::Error> for TrackerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() || err.is_builder() {
            TrackerError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            TrackerError::UpstreamRejected(status.as_u16())
        } else {
            TrackerError::Unknown(err.to_string())
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let status = match &self {
            TrackerError::Connection(_) => StatusCode::BAD_GATEWAY,
            TrackerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            TrackerError::UpstreamRejected(_) => StatusCode::BAD_GATEWAY,
            TrackerError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the timetracker cache.
pub type Result<T> = std::result::Result<T, TrackerError>;
