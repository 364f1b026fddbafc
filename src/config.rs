//! Configuration management for taskindicator.
//!
//! Settings live in `<config dir>/taskindicator/config.yaml`. Every field is
//! optional; a missing file means defaults.

use crate::error::Result;
use crate::taskwarrior::DEFAULT_PROGRAM;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file path relative to the user's config directory.
pub const CONFIG_FILE_PATH: &str = "taskindicator/config.yaml";

/// User configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// The task tool binary to invoke.
    #[serde(default = "default_program")]
    pub program: String,

    /// Data folder override. When unset the folder is asked of the tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_location: Option<PathBuf>,

    /// Kill task tool invocations that run longer than this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self { program: default_program(), data_location: None, command_timeout_secs: None }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Ok(Self::load_from(&path)?.unwrap_or_default()),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file, returning None if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Save config to a specific file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The default config file location, if a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_FILE_PATH))
    }

    /// The configured command timeout.
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}
