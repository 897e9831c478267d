//! Client-side configuration loading
//!
//! Loads the default endpoint, display name, and endpoint aliases from
//! the shared config file. A missing or unparsable file degrades to
//! defaults with a logged warning, never an error.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

/// Default demo endpoint: a public echo server
pub const DEFAULT_URL: &str = "wss://echo.websocket.events";

/// Default display name when none is configured
pub const DEFAULT_USER: &str = "Guest";

/// Client configuration (`~/.config/parley/config.toml`)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Default endpoint address
    pub url: String,
    /// Default display name
    pub user: String,
    /// Named endpoint aliases, e.g. `staging = "wss://staging.example/ws"`
    pub remotes: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.into(),
            user: DEFAULT_USER.into(),
            remotes: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// Load from the default config file location
    pub fn load() -> Self {
        Self::load_from(&parley_utils::config_file())
    }

    /// Load from a specific path, degrading to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("Config file not found, using defaults");
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<ClientConfig>(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Resolve a remote alias to an endpoint address
    pub fn resolve_remote(&self, name: &str) -> Option<String> {
        self.remotes.get(name).cloned()
    }
}
