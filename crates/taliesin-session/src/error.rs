//! Error types for session cache operations.

/// Error type for provider-backed cache operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider's connection target is missing or invalid.
    #[error("Provider configuration error: {0}")]
    Configuration(String),

    /// The provider failed to open a handle. Nothing is cached for the
    /// user, so a later call may retry.
    #[error("Failed to open handle: {0}")]
    Open(String),

    /// The provider failed to close a handle.
    #[error("Failed to close handle: {0}")]
    Close(String),
}

/// Result type for session cache operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
