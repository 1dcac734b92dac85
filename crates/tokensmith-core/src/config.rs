use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TokensmithError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub webex: WebexConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Credential store, read at start and overwritten at the end of a run.
    #[serde(default = "default_store_path")]
    pub path: String,
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_store_path() -> String {
    "tokens_master.json".to_string()
}

fn default_snapshot_dir() -> String {
    "access_tokens".to_string()
}

fn default_log_dir() -> String {
    "token_logs".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            snapshot_dir: default_snapshot_dir(),
            log_dir: default_log_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebexConfig {
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

fn default_token_url() -> String {
    "https://webexapis.com/v1/access_token".to_string()
}

impl Default for WebexConfig {
    fn default() -> Self {
        Self {
            token_url: default_token_url(),
        }
    }
}

impl Config {
    /// Load config from `path` if it exists, otherwise use the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| TokensmithError::Config(format!("failed to read config: {e}")))?;
        toml::from_str(&content)
            .map_err(|e| TokensmithError::Config(format!("failed to parse config: {e}")))
    }
}
