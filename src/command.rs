//! Real command execution implementation.

use crate::error::{Error, Result};
use crate::traits::{CommandOutput, CommandRunner};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled while a timeout is in effect.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Real command runner that spawns processes.
#[derive(Debug, Default, Clone)]
pub struct RealCommandRunner;

impl RealCommandRunner {
    /// Create a new command runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CommandRunner for RealCommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<CommandOutput> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let Some(timeout) = timeout else {
            let output = child.wait_with_output()?;
            return Ok(CommandOutput {
                exit_code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        };

        wait_with_timeout(child, timeout).map_err(|err| match err {
            WaitError::TimedOut => Error::CommandTimeout {
                command: render_command(program, args),
                timeout,
            },
            WaitError::Io(e) => Error::Io(e),
        })
    }
}

enum WaitError {
    TimedOut,
    Io(std::io::Error),
}

impl From<std::io::Error> for WaitError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Wait for a child, killing it once the deadline passes.
///
/// Output pipes are drained on background threads so a chatty child cannot
/// block on a full pipe while we poll.
fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
) -> std::result::Result<CommandOutput, WaitError> {
    let stdout = child.stdout.take().map(spawn_reader);
    let stderr = child.stderr.take().map(spawn_reader);

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                reap(&mut child);
                return Err(WaitError::TimedOut);
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                reap(&mut child);
                return Err(e.into());
            }
        }
    };

    Ok(CommandOutput {
        exit_code: status.code().unwrap_or(-1),
        stdout: join_reader(stdout),
        stderr: join_reader(stderr),
    })
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_reader(handle: Option<thread::JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

/// Render a command line for error messages.
pub(crate) fn render_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program).chain(args.iter().copied()).collect::<Vec<_>>().join(" ")
}
