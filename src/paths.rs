//! Locations of the task database files.
//!
//! The data folder is resolved once, either from [`Config::data_location`] or
//! by asking the task tool for its `data.location` setting, and the resulting
//! [`DataPaths`] is handed to every component that touches the filesystem.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::taskwarrior::TaskTool;
use std::path::{Path, PathBuf};

/// Name of the pending tasks database.
pub const PENDING_FILENAME: &str = "pending.data";

/// Name of the completed tasks database.
pub const COMPLETED_FILENAME: &str = "completed.data";

/// Folder holding one note file per task.
pub const NOTES_DIRNAME: &str = "notes";

const DATA_LOCATION_KEY: &str = "data.location=";

/// The resolved data folder and the files within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Use `root` as the data folder.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the data folder from config, or from the tool when unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the tool does not report a data
    /// location, or propagates the tool's failure.
    pub fn resolve(config: &Config, tool: &TaskTool<'_>) -> Result<Self> {
        if let Some(location) = &config.data_location {
            return Ok(Self::new(expand_home(&location.to_string_lossy())));
        }
        let root = find_data_location(&tool.show_config()?)?;
        tracing::debug!(path = %root.display(), "Resolved task data folder");
        Ok(Self::new(root))
    }

    /// The data folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `pending.data`.
    pub fn pending(&self) -> PathBuf {
        self.root.join(PENDING_FILENAME)
    }

    /// Path of `completed.data`.
    pub fn completed(&self) -> PathBuf {
        self.root.join(COMPLETED_FILENAME)
    }

    /// Folder holding note files.
    pub fn notes_dir(&self) -> PathBuf {
        self.root.join(NOTES_DIRNAME)
    }
}

/// Scan a `key=value` configuration dump for the data location.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if no `data.location=` line is present.
pub fn find_data_location(dump: &str) -> Result<PathBuf> {
    dump.lines()
        .find_map(|line| line.strip_prefix(DATA_LOCATION_KEY))
        .map(|value| expand_home(value.trim()))
        .ok_or_else(|| Error::Configuration("Could not find task database location.".to_string()))
}

/// Expand a leading `~/` to the home directory.
fn expand_home(value: &str) -> PathBuf {
    match (value.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if value == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(value)),
        _ => PathBuf::from(value),
    }
}
