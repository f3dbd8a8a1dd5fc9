//! MDU CLI - Main entry point

use clap::Parser;
use mdu_cli::{Cli, Commands, Config};
use mdu_common::logging::{init_logging, LogConfig, LogLevel};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Pick up MDU_* settings from a local .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging based on verbose flag, letting the environment win
    let log_config = if cli.verbose {
        LogConfig::builder()
            .level(LogLevel::Debug)
            .file_prefix("mdu-cli".to_string())
            .build()
    } else {
        LogConfig::builder()
            .level(LogLevel::Warn)
            .file_prefix("mdu-cli".to_string())
            .build()
    };
    let log_config = log_config.clone().overlay_env().unwrap_or(log_config);

    // The CLI should keep working even when logging cannot initialize
    let _ = init_logging(&log_config);

    if let Err(e) = execute_command(cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: Cli) -> mdu_cli::Result<()> {
    match cli.command {
        Commands::Upload {
            file,
            batch_size,
            concurrency,
            report,
            dry_run,
        } => {
            let config = Config::resolve(cli.server_url, batch_size, concurrency, cli.verbose)?;
            mdu_cli::commands::upload::run(file, config, report, dry_run).await
        }

        Commands::Validate { file } => mdu_cli::commands::validate::run(file).await,
    }
}
