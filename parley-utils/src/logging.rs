//! Logging infrastructure for parley
//!
//! Provides unified logging setup using the tracing ecosystem.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::{paths, ParleyError, Result};

/// Log output destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    /// Log to stderr
    Stderr,
    /// Log to file (for the interactive client, which owns the terminal)
    File,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Output destination
    pub output: LogOutput,
    /// Log level filter (e.g., "info", "parley=debug,tokio=warn")
    pub filter: String,
    /// Optional custom log file name (defaults to "parley.log")
    pub file_name: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            output: LogOutput::Stderr,
            filter: "info".into(),
            file_name: None,
        }
    }
}

impl LogConfig {
    /// Create config for the chat client (file logging, since the REPL
    /// owns the terminal)
    pub fn client() -> Self {
        Self {
            output: LogOutput::File,
            filter: std::env::var("PARLEY_LOG").unwrap_or_else(|_| "warn".into()),
            file_name: None,
        }
    }

    /// Create config for the mock room (separate file)
    pub fn mock() -> Self {
        Self {
            output: LogOutput::File,
            filter: std::env::var("PARLEY_LOG").unwrap_or_else(|_| "warn".into()),
            file_name: Some("parley-mock.log".into()),
        }
    }

    /// Create config for development (verbose stderr)
    pub fn development() -> Self {
        Self {
            output: LogOutput::Stderr,
            filter: "debug".into(),
            file_name: None,
        }
    }
}

/// Initialize logging for this process
pub fn init_logging_with_config(config: LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|e| ParleyError::config(format!("Invalid log filter: {}", e)))?;

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false);

    match config.output {
        LogOutput::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer.with_writer(std::io::stderr))
                .try_init()
                .map_err(|e| ParleyError::internal(format!("Failed to init logging: {}", e)))?;
        }
        LogOutput::File => {
            let log_dir = paths::log_dir();
            std::fs::create_dir_all(&log_dir).map_err(|e| ParleyError::FileWrite {
                path: log_dir.clone(),
                source: e,
            })?;

            let file_name = config.file_name.as_deref().unwrap_or("parley.log");
            let log_path = log_dir.join(file_name);
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .map_err(|e| ParleyError::FileWrite {
                    path: log_path,
                    source: e,
                })?;

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer.with_writer(file).with_ansi(false))
                .try_init()
                .map_err(|e| ParleyError::internal(format!("Failed to init logging: {}", e)))?;
        }
    }

    tracing::debug!(filter = %config.filter, "Logging initialized");
    Ok(())
}
