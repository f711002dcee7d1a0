//! # Configuration
//!
//! JSON configuration for applications embedding the channel manager.
//!
//! ```json
//! {
//!   "data_dir": "/var/lib/releases",
//!   "channels": [
//!     { "name": "stable", "retention_days": 730, "approvers": ["release-lead"] }
//!   ]
//! }
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::channels::ChannelConfig;
use crate::manager::ChannelManager;
use crate::store::{FileStore, StoreError};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(String),

    #[error("invalid config JSON: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),
}

impl ConfigError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read(_) => "CONFIG_READ_ERROR",
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR",
            ConfigError::Invalid(_) => "CONFIG_INVALID",
            ConfigError::Store(_) => "CONFIG_STORE_ERROR",
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the file store (required)
    pub data_dir: String,

    /// Policies replacing the built-in defaults for the named channels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<ChannelConfig>,
}

impl Config {
    /// Config rooted at `data_dir` with built-in channel policies
    pub fn new(data_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            channels: Vec::new(),
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }

        let mut seen = BTreeSet::new();
        for channel in &self.channels {
            if !seen.insert(channel.name) {
                return Err(ConfigError::Invalid(format!(
                    "channel {} configured more than once",
                    channel.name
                )));
            }
            if channel.retention_days < 0 {
                return Err(ConfigError::Invalid(format!(
                    "channel {}: retention_days must be >= 0",
                    channel.name
                )));
            }
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Open the file store at `data_dir`, creating its layout if needed
    pub fn open_store(&self) -> ConfigResult<FileStore> {
        Ok(FileStore::open(self.data_path())?)
    }

    /// Open the store and build a manager seeded with the configured
    /// policies. The manager still needs `initialize`.
    pub fn build_manager(&self) -> ConfigResult<ChannelManager> {
        let store = self.open_store()?;
        Ok(ChannelManager::new(Arc::new(store)).with_seed_configs(self.channels.clone()))
    }
}
