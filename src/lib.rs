//! # `taskindicator`
//!
//! A cached, queryable view of a Taskwarrior database.
//!
//! The raw `pending.data` and `completed.data` files are parsed directly so
//! that timestamps stay as epoch seconds, then enriched with the urgency the
//! tool computes in its JSON export. Per-task notes live in plain files next
//! to the database. Changes are never written to the database directly; they
//! are requested from the `task` binary.
//!
//! ```no_run
//! use taskindicator::{Config, Database, RealCommandRunner, TaskTool};
//!
//! let config = Config::load().unwrap();
//! let runner = RealCommandRunner::new();
//! let mut db = Database::open(TaskTool::from_config(&runner, &config), &config).unwrap();
//!
//! for task in db.get_tasks().unwrap() {
//!     println!("{task}");
//! }
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod collection;
pub mod command;
pub mod config;
pub mod database;
pub mod error;
pub mod merge;
pub mod notes;
pub mod parser;
pub mod paths;
pub mod record;
pub mod task;
pub mod taskwarrior;
pub mod testing;
pub mod tokenizer;
pub mod traits;

pub use collection::TaskCollection;
pub use command::RealCommandRunner;
pub use config::Config;
pub use database::{Database, Properties};
pub use error::{Error, Result, Warning};
pub use notes::NoteStore;
pub use paths::DataPaths;
pub use record::{Record, Value};
pub use task::Task;
pub use taskwarrior::TaskTool;
pub use traits::{CommandOutput, CommandRunner};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
