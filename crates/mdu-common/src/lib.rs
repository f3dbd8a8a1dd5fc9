//! MDU Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared utilities and error handling for the MDU workspace.
//!
//! # Overview
//!
//! This crate provides functionality used across all MDU workspace members:
//!
//! - **Error Handling**: Shared error type and result alias
//! - **Logging**: Tracing subscriber configuration and initialization
//! - **Checksums**: Digests for upload source files
//!
//! # Example
//!
//! ```no_run
//! use mdu_common::{MduError, Result};
//! use mdu_common::checksum::file_sha256;
//!
//! fn stamp_source(path: &str) -> Result<()> {
//!     let digest = file_sha256(path)?;
//!     tracing::info!(%digest, "upload source loaded");
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{MduError, Result};
