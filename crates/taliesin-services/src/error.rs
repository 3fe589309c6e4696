//! Error types for the services crate.

use thiserror::Error;

/// Result type alias for service calls.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors that can occur talking to the productivity APIs.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request timed out (retryable).
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Could not reach the service (retryable).
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Other transport-level failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The account has no task list to operate on.
    #[error("No task list found")]
    NoTaskList,
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout(err.to_string())
        } else if err.is_connect() {
            ServiceError::Connect(err.to_string())
        } else if err.is_decode() {
            ServiceError::UnexpectedResponse(err.to_string())
        } else {
            ServiceError::Http(err.to_string())
        }
    }
}
