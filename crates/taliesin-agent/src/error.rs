//! Error types for the assistant core.

use thiserror::Error;

/// Errors that can occur while running the assistant.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Session metadata was missing or malformed.
    #[error("Invalid session metadata: {0}")]
    Metadata(String),

    /// The session cache could not open or close a memory handle.
    #[error("Session error: {0}")]
    Session(#[from] taliesin_session::ProviderError),

    /// The productivity services client could not be constructed.
    #[error("Service client error: {0}")]
    Services(#[from] taliesin_services::ServiceError),

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;
