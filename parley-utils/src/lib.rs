//! parley-utils: Common utilities for the parley workspace
//!
//! Provides the unified error type, logging setup, and XDG path helpers
//! shared by the client binaries.

pub mod error;
pub mod logging;
pub mod paths;

pub use error::{ParleyError, Result};
pub use logging::{init_logging_with_config, LogConfig, LogOutput};
pub use paths::{
    config_dir, config_file, data_dir, ensure_dir, log_dir, mock_store_file, state_dir,
    transcript_file,
};
