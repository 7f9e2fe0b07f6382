//! Store errors.

use thiserror::Error;

/// Store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage cannot be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed export bundle.
    #[error("Invalid bundle: {0}")]
    InvalidBundle(String),
}
