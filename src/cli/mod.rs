//! Command-line interface for taskindicator.
//!
//! The binary is a thin wrapper; parsing lives here and execution in
//! [`run`], which is testable with a scripted command runner.

mod run;


pub use run::{run, CliOutput};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect and drive a Taskwarrior database.
#[derive(Parser, Debug)]
#[command(name = "taskindicator")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List pending and completed tasks.
    List {
        /// Only show started tasks
        #[arg(long)]
        active: bool,
    },

    /// Show one task with its note.
    Show {
        /// Task uuid
        uuid: String,
    },

    /// List project names.
    Projects,

    /// Start a task.
    Start {
        /// Task id or uuid
        id: String,
    },

    /// Stop a task.
    Stop {
        /// Task id or uuid
        id: String,
    },

    /// Stop a task and mark it done.
    Finish {
        /// Task id or uuid
        id: String,
    },

    /// Reopen a task and start it.
    Restart {
        /// Task id or uuid
        id: String,
    },

    /// Create a task and print its uuid.
    Add {
        /// Description of the task
        description: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Modify a task.
    Modify {
        /// Task id or uuid
        id: String,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Print a task's note, or replace it. An empty text deletes the note.
    Note {
        /// Task uuid
        uuid: String,

        /// New note text
        text: Option<String>,
    },
}

/// Fields shared by `add` and `modify`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FieldArgs {
    /// Project name
    #[arg(short, long)]
    pub project: Option<String>,

    /// Priority (H, M or L)
    #[arg(long)]
    pub priority: Option<String>,

    /// Tag to add (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Note text to store alongside the task
    #[arg(short, long)]
    pub note: Option<String>,

    /// Extra `key:value` attribute (repeatable)
    #[arg(long = "set", value_name = "KEY:VALUE")]
    pub attributes: Vec<String>,
}
