//! CLI binary for `taskindicator`.
//!
//! This binary is a thin wrapper that delegates to the library.

use std::process::ExitCode;

use clap::Parser;
use taskindicator::cli::Cli;
use taskindicator::{Config, RealCommandRunner};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    // Logging is opt-in via RUST_LOG; an invalid filter means off.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path).map(Option::unwrap_or_default),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let runner = RealCommandRunner::new();
    let output = taskindicator::cli::run(cli.command, &config, &runner);

    for line in output.stdout {
        println!("{line}");
    }
    for line in output.stderr {
        eprintln!("{line}");
    }

    output.exit_code
}
