//! Storage error types.

use thiserror::Error;

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (e.g., already exists)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backend failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;
