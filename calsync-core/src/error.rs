//! Error types for calsync.

use thiserror::Error;

/// Errors that can occur outside of a remote API call.
#[derive(Error, Debug)]
pub enum CalsyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Checkpoint error: {0}")]
    Checkpoint(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for calsync operations.
pub type CalsyncResult<T> = Result<T, CalsyncError>;
