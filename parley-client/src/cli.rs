//! Command-line argument parsing for the parley client
//!
//! Uses clap for argument parsing with derive macros.

use clap::Parser;
use std::path::PathBuf;

/// parley - WebSocket chat client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Endpoint address (ws://host:port or wss://host/path)
    ///
    /// Overrides the url from the config file. The default endpoint is a
    /// public echo server, which bounces every sent message back.
    #[arg(long, env = "PARLEY_URL")]
    pub url: Option<String>,

    /// Display name shown on sent messages
    #[arg(long, short = 'u', env = "PARLEY_USER")]
    pub user: Option<String>,

    /// Named endpoint alias from the config file's [remotes] table
    ///
    /// Example: parley --remote staging
    #[arg(long, conflicts_with = "url")]
    pub remote: Option<String>,

    /// Custom transcript file path
    ///
    /// Overrides the default transcript location in the data directory.
    #[arg(long)]
    pub transcript: Option<PathBuf>,

    /// Connect immediately on startup instead of waiting for /connect
    #[arg(long, default_value_t = false)]
    pub connect: bool,

    /// Log verbosely to stderr instead of the log file
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
