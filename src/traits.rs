//! Core traits for testability and abstraction.

use crate::error::Result;
use std::time::Duration;

/// Output from a command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// The exit code of the command.
    pub exit_code: i32,
    /// The stdout output.
    pub stdout: String,
    /// The stderr output.
    pub stderr: String,
}

impl CommandOutput {
    /// Build a successful output carrying only stdout.
    #[must_use]
    pub fn stdout(stdout: impl Into<String>) -> Self {
        Self { exit_code: 0, stdout: stdout.into(), stderr: String::new() }
    }

    /// Check if the command succeeded (exit code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait for running external commands.
///
/// Everything that talks to the task tool goes through this trait so that
/// tests can substitute a scripted runner.
pub trait CommandRunner {
    /// Run a program with the given arguments and optional timeout.
    ///
    /// A non-zero exit code is reported through [`CommandOutput::exit_code`],
    /// not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned, or if it outlives
    /// the timeout.
    fn run(&self, program: &str, args: &[&str], timeout: Option<Duration>)
        -> Result<CommandOutput>;
}
