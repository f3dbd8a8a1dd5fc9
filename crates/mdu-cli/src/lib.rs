//! MDU CLI Library
//!
//! Command-line interface for bulk record uploads with MDU.
//!
//! # Overview
//!
//! The `mdu` binary drives the upload pipeline from a terminal:
//!
//! - **Upload**: submit a parsed row file in batches with a live progress
//!   display (`mdu upload`)
//! - **Validate**: flatten pre-submission validation markings into a
//!   per-field report without touching the network (`mdu validate`)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod progress;
pub mod rows;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Result};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MDU - Mass Data Upload
#[derive(Parser, Debug)]
#[command(name = "mdu")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend server URL
    #[arg(
        long,
        env = "MDU_SERVER_URL",
        default_value = "http://localhost:8000",
        global = true
    )]
    pub server_url: String,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a row file to the backend in batches
    Upload {
        /// Path to the parsed row file (JSON array of row objects)
        #[arg(short, long)]
        file: PathBuf,

        /// Rows per submitted batch
        #[arg(long, env = "MDU_BATCH_SIZE")]
        batch_size: Option<usize>,

        /// Batches in flight at once
        #[arg(long, env = "MDU_CONCURRENCY")]
        concurrency: Option<usize>,

        /// Write the final progress snapshot as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Accept every batch locally instead of submitting
        #[arg(long)]
        dry_run: bool,
    },

    /// Report validation errors in a row file without uploading
    Validate {
        /// Path to the parsed row file (JSON array of row objects)
        #[arg(short, long)]
        file: PathBuf,
    },
}
