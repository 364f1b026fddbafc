//! Error types for `taskindicator`.
//!
//! Fatal conditions are variants of [`Error`]. Conditions that are logged and
//! skipped are values of [`Warning`], returned alongside successful results.

use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while reading or mutating the task database.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The task tool's configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A database file contains a line that cannot be parsed.
    #[error("Unsupported file format in {} (line {line}): {reason}", path.display())]
    Format {
        /// The offending database file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: LineError,
    },

    /// An operation was attempted on a task in the wrong state.
    #[error("{0}")]
    Precondition(String),

    /// A note value was not a text string.
    #[error("Note must be a text string, got {0}")]
    InvalidNote(String),

    /// A command execution failed.
    #[error("Command '{command}' failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        /// The command that was run.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// The stderr output.
        stderr: String,
    },

    /// A command timed out.
    #[error("Command '{command}' timed out after {timeout:?}")]
    CommandTimeout {
        /// The command that was run.
        command: String,
        /// The timeout that expired.
        timeout: std::time::Duration,
    },
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a single database line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    /// The line is not wrapped in `[` and `]`.
    #[error("line is not enclosed in brackets")]
    NotBracketed,

    /// A quoted section was never closed.
    #[error("no closing quotation")]
    UnterminatedQuote,

    /// The line ends with a lone backslash.
    #[error("no escaped character")]
    TrailingEscape,

    /// The line is not valid UTF-8.
    #[error("invalid UTF-8")]
    InvalidUtf8,
}

/// A recoverable condition that was logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A token without a `key:value` separator was dropped.
    MalformedToken(String),
    /// A task was not present in the tool's export, so it has no urgency.
    NotExported(String),
    /// A record has no `uuid` and cannot be matched against the export.
    MissingUuid,
    /// A database file does not exist and contributed no tasks.
    MissingDatabase(PathBuf),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedToken(token) => write!(f, "malformed database token: {token}"),
            Self::NotExported(uuid) => write!(f, "task {uuid} not exported by the task tool"),
            Self::MissingUuid => write!(f, "task record has no uuid"),
            Self::MissingDatabase(path) => {
                write!(f, "database {} does not exist", path.display())
            }
        }
    }
}
