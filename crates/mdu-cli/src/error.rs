//! Error types for the MDU CLI
//!
//! All errors are user-facing and carry a clear message plus a hint about
//! how to fix the situation.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Comprehensive error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Required file is missing
    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    /// Row file has the wrong shape
    #[error("Invalid row file: {0}. Expected a JSON array of row objects as produced by the spreadsheet parser.")]
    InvalidRows(String),

    /// Upload finished with failed rows
    #[error("Upload incomplete: {0}. See the failure table above for per-row details.")]
    Upload(String),

    /// Validation finished with findings
    #[error("Validation failed: {0}. Fix the reported fields and re-run.")]
    Validation(String),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or command-line flags.")]
    Config(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}. Check the file syntax.")]
    JsonParse(#[from] serde_json::Error),

    /// HTTP client could not be constructed
    #[error("Network client error: {0}. Check your server URL and proxy settings.")]
    Http(#[from] reqwest::Error),

    /// Shared library error
    #[error(transparent)]
    Common(#[from] mdu_common::MduError),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid-rows error
    pub fn invalid_rows(msg: impl Into<String>) -> Self {
        Self::InvalidRows(msg.into())
    }

    /// Create an upload error
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }
}
