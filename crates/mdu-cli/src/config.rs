//! Configuration for the MDU CLI
//!
//! Settings come from command-line flags layered over `MDU_*` environment
//! variables (including anything loaded from `.env`).

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Default backend URL when not specified via flag or environment variable.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Default rows per submitted batch.
pub const DEFAULT_BATCH_SIZE: usize = 25;

/// Default number of batches in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Resolved CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend server URL
    pub server_url: String,

    /// Rows per submitted batch
    pub batch_size: usize,

    /// Batches in flight at once
    pub concurrency: usize,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

impl Config {
    /// Build a config from resolved CLI inputs, applying defaults.
    pub fn resolve(
        server_url: String,
        batch_size: Option<usize>,
        concurrency: Option<usize>,
        verbose: bool,
    ) -> Result<Self> {
        let batch_size = batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(CliError::config("batch size must be at least 1"));
        }

        let concurrency = concurrency.unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(CliError::config("concurrency must be at least 1"));
        }

        Ok(Self {
            server_url,
            batch_size,
            concurrency,
            verbose,
        })
    }

    /// Get the server URL
    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            verbose: false,
        }
    }
}
