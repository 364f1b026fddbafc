//! Testing utilities and mock implementations.
//!
//! These types are provided for use in tests. They may appear unused in
//! the library itself but are consumed by unit and integration tests.

#![allow(dead_code)]

use crate::error::Result;
use crate::traits::{CommandOutput, CommandRunner};
use std::cell::RefCell;
use std::time::Duration;

/// A scripted command runner.
///
/// Commands must arrive in exactly the order they were expected; each call
/// returns the paired output. Every call is recorded for later inspection.
#[derive(Debug, Default)]
pub struct MockCommandRunner {
    expectations: RefCell<Vec<(String, Vec<String>, CommandOutput)>>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl MockCommandRunner {
    /// Create a new mock command runner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expected command and its output.
    pub fn expect(&mut self, program: &str, args: &[&str], output: CommandOutput) {
        self.expectations.borrow_mut().push((
            program.to_string(),
            args.iter().map(|s| (*s).to_string()).collect(),
            output,
        ));
    }

    /// Add an expected command that succeeds with the given stdout.
    pub fn expect_stdout(&mut self, program: &str, args: &[&str], stdout: &str) {
        self.expect(program, args, CommandOutput::stdout(stdout));
    }

    /// Arguments of every call made so far, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Verify all expected commands were called.
    ///
    /// # Panics
    ///
    /// Panics if not all expected commands were called.
    pub fn verify(&self) {
        let made = self.calls.borrow().len();
        let expected = self.expectations.borrow().len();
        assert_eq!(made, expected, "Expected {expected} command calls, but only {made} were made");
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Option<Duration>,
    ) -> Result<CommandOutput> {
        let index = self.calls.borrow().len();
        let expectations = self.expectations.borrow();

        assert!(
            index < expectations.len(),
            "Unexpected command call: {program} {args:?} (no more expectations)"
        );

        let (exp_program, exp_args, output) = &expectations[index];
        let args_vec: Vec<String> = args.iter().map(|s| (*s).to_string()).collect();

        assert!(
            program == exp_program && &args_vec == exp_args,
            "Command mismatch at index {index}:\n  Expected: {exp_program} {exp_args:?}\n  Got: {program} {args:?}"
        );

        self.calls.borrow_mut().push(args_vec);
        Ok(output.clone())
    }
}

/// A command runner that always fails to spawn, for testing error paths.
#[derive(Debug, Default)]
pub struct FailingCommandRunner {
    error_message: String,
}

impl FailingCommandRunner {
    /// Create a new failing command runner with the specified error message.
    #[must_use]
    pub fn new(error_message: impl Into<String>) -> Self {
        Self { error_message: error_message.into() }
    }
}

impl CommandRunner for FailingCommandRunner {
    fn run(
        &self,
        _program: &str,
        _args: &[&str],
        _timeout: Option<Duration>,
    ) -> Result<CommandOutput> {
        Err(std::io::Error::other(self.error_message.clone()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_command_runner() {
        let mut runner = MockCommandRunner::new();
        runner.expect_stdout("task", &["_show"], "data.location=/tmp\n");

        let output = runner.run("task", &["_show"], None).unwrap();
        assert_eq!(output.stdout, "data.location=/tmp\n");
        assert_eq!(runner.calls(), vec![vec!["_show".to_string()]]);
        runner.verify();
    }

    #[test]
    #[should_panic(expected = "Command mismatch")]
    fn test_mock_command_runner_wrong_command() {
        let mut runner = MockCommandRunner::new();
        runner.expect("task", &["1", "start"], CommandOutput::default());

        let _ = runner.run("task", &["1", "stop"], None);
    }

    #[test]
    #[should_panic(expected = "no more expectations")]
    fn test_mock_command_runner_too_many_calls() {
        let runner = MockCommandRunner::new();
        let _ = runner.run("task", &["export"], None);
    }

    #[test]
    #[should_panic(expected = "Expected 1 command calls")]
    fn test_mock_command_runner_verify_fails() {
        let mut runner = MockCommandRunner::new();
        runner.expect("task", &["export"], CommandOutput::default());
        runner.verify();
    }

    #[test]
    fn test_failing_command_runner() {
        let runner = FailingCommandRunner::new("task not installed");
        let result = runner.run("task", &["export"], None);
        assert!(result.is_err());
    }
}
