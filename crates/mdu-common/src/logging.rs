//! Logging Configuration and Initialization
//!
//! Centralized logging setup for all MDU components:
//!
//! - Multiple output targets (console, file, both)
//! - Multiple log formats (text, JSON)
//! - Configurable log levels with `RUST_LOG` override
//! - Daily log file rotation
//! - Environment-based configuration (`MDU_LOG_*`)
//!
//! Application code uses the structured `tracing` macros (`debug!`, `info!`,
//! `warn!`, `error!`) with fields rather than `println!`; only user-facing
//! CLI report output goes to stdout directly.
//!
//! # Example
//!
//! ```no_run
//! use mdu_common::logging::{init_logging, LogConfig};
//! use tracing::info;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!
//!     info!("Application started");
//!     Ok(())
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

// Keeps the non-blocking file writer alive for the process lifetime.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Log level for filtering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(anyhow::anyhow!("Invalid log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Output target for logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Output to console only
    #[default]
    Console,
    /// Output to a daily-rotated file only
    File,
    /// Output to both console and file
    Both,
}

impl std::str::FromStr for LogOutput {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "stdout" => Ok(LogOutput::Console),
            "file" => Ok(LogOutput::File),
            "both" | "all" => Ok(LogOutput::Both),
            _ => Err(anyhow::anyhow!("Invalid log output: {}", s)),
        }
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum level to record (overridden by `RUST_LOG` when set)
    pub level: LogLevel,
    /// Where log lines go
    pub output: LogOutput,
    /// How log lines are rendered
    pub format: LogFormat,
    /// Directory for log files (file output only)
    pub dir: PathBuf,
    /// Log file name prefix (file output only)
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            output: LogOutput::default(),
            format: LogFormat::default(),
            dir: PathBuf::from("logs"),
            file_prefix: "mdu".to_string(),
        }
    }
}

impl LogConfig {
    /// Start building a config from defaults
    pub fn builder() -> LogConfigBuilder {
        LogConfigBuilder {
            config: LogConfig::default(),
        }
    }

    /// Load configuration from `MDU_LOG_*` environment variables over the
    /// defaults.
    pub fn from_env() -> Result<Self> {
        LogConfig::default().overlay_env()
    }

    /// Apply `MDU_LOG_*` environment variables on top of this config.
    ///
    /// Unset variables keep their current values; set-but-invalid variables
    /// are an error so misconfiguration is not silently ignored.
    pub fn overlay_env(mut self) -> Result<Self> {
        if let Ok(level) = std::env::var("MDU_LOG_LEVEL") {
            self.level = level.parse()?;
        }
        if let Ok(output) = std::env::var("MDU_LOG_OUTPUT") {
            self.output = output.parse()?;
        }
        if let Ok(format) = std::env::var("MDU_LOG_FORMAT") {
            self.format = format.parse()?;
        }
        if let Ok(dir) = std::env::var("MDU_LOG_DIR") {
            self.dir = PathBuf::from(dir);
        }
        if let Ok(prefix) = std::env::var("MDU_LOG_FILE_PREFIX") {
            self.file_prefix = prefix;
        }

        Ok(self)
    }
}

/// Builder for [`LogConfig`]
#[derive(Debug, Clone)]
pub struct LogConfigBuilder {
    config: LogConfig,
}

impl LogConfigBuilder {
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.config.output = output;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.dir = dir.into();
        self
    }

    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.file_prefix = prefix.into();
        self
    }

    pub fn build(self) -> LogConfig {
        self.config
    }
}

/// Initialize the global tracing subscriber from a [`LogConfig`].
///
/// May only be called once per process; a second call returns an error from
/// the underlying subscriber registry.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![filter.boxed()];

    if matches!(config.output, LogOutput::Console | LogOutput::Both) {
        let layer = match config.format {
            LogFormat::Text => fmt::layer().with_target(true).boxed(),
            LogFormat::Json => fmt::layer().json().boxed(),
        };
        layers.push(layer);
    }

    if matches!(config.output, LogOutput::File | LogOutput::Both) {
        std::fs::create_dir_all(&config.dir).with_context(|| {
            format!("Failed to create log directory: {}", config.dir.display())
        })?;

        let appender = tracing_appender::rolling::daily(&config.dir, &config.file_prefix);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);

        let layer = match config.format {
            LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(false).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
        };
        layers.push(layer);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("Failed to initialize logging subscriber")?;

    tracing::debug!(
        level = %config.level,
        output = ?config.output,
        format = ?config.format,
        "logging initialized"
    );

    Ok(())
}
