//! Error types for configuration store operations.

use thiserror::Error;

/// Errors that can occur while reading or writing `apps.json`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The temporary file could not be moved over the target.
    #[error("failed to replace configuration file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
