//! Error types for MDU

use thiserror::Error;

/// Result type alias for MDU operations
pub type Result<T> = std::result::Result<T, MduError>;

/// Main error type for MDU
#[derive(Error, Debug)]
pub enum MduError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
