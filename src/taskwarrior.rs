//! Invocation of the external task tool.
//!
//! [`TaskTool`] pairs a [`CommandRunner`] with the program name and timeout
//! from [`Config`], and turns non-zero exit codes into
//! [`Error::CommandFailed`]. Callers never look at exit codes themselves.

use crate::command::render_command;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::traits::CommandRunner;
use std::time::Duration;

/// Default name of the task tool binary.
pub const DEFAULT_PROGRAM: &str = "task";

/// Handle for issuing requests to the task tool.
#[derive(Clone, Copy)]
pub struct TaskTool<'a> {
    runner: &'a dyn CommandRunner,
    program: &'a str,
    timeout: Option<Duration>,
}

impl<'a> TaskTool<'a> {
    /// Create a tool handle using the default program and no timeout.
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner, program: DEFAULT_PROGRAM, timeout: None }
    }

    /// Create a tool handle configured from `config`.
    pub fn from_config(runner: &'a dyn CommandRunner, config: &'a Config) -> Self {
        Self { runner, program: &config.program, timeout: config.command_timeout() }
    }

    /// The program this handle invokes.
    pub const fn program(&self) -> &str {
        self.program
    }

    /// Run the tool and return its stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be spawned, times out, or exits
    /// with a non-zero status.
    pub fn run(&self, args: &[&str]) -> Result<String> {
        tracing::debug!(command = %render_command(self.program, args), "Running task tool");
        let output = self.runner.run(self.program, args, self.timeout)?;
        if !output.success() {
            return Err(Error::CommandFailed {
                command: render_command(self.program, args),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    /// Dump the tool's configuration as `key=value` lines.
    ///
    /// # Errors
    ///
    /// Propagates command failures.
    pub fn show_config(&self) -> Result<String> {
        self.run(&["_show"])
    }

    /// Export every task as a JSON array.
    ///
    /// # Errors
    ///
    /// Propagates command failures.
    pub fn export(&self) -> Result<String> {
        self.run(&["rc.json.array=1", "export"])
    }
}

impl std::fmt::Debug for TaskTool<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskTool")
            .field("program", &self.program)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
