//! Error types for the memory crate.

use thiserror::Error;

/// Errors that can occur in the memory crate.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Database connection or operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem operation failed (e.g., creating the database directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid data or state.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for memory operations.
pub type Result<T> = std::result::Result<T, MemoryError>;
