//! Cached access to the task database and requests to change it.
//!
//! Reads come from a [`TaskCollection`] that is loaded on first use and kept
//! until [`Database::refresh`]. Changes are sent to the task tool; the cache
//! is dropped after each one so the next read sees the tool's result.

use crate::collection::TaskCollection;
use crate::error::Result;
use crate::notes::NoteStore;
use crate::paths::DataPaths;
use crate::record::{Value, TAGS, UUID};
use crate::task::Task;
use crate::taskwarrior::TaskTool;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::SystemTime;

/// Property holding a task's description.
pub const DESCRIPTION: &str = "description";
/// Property diverted to the note store.
pub const NOTE: &str = "note";

static CREATED_TASK: Lazy<Regex> = Lazy::new(|| Regex::new(r"Created task (\d+)").unwrap());

/// Properties for creating or modifying a task, in insertion order.
pub type Properties = crate::record::Record;

/// Task tool arguments derived from a property set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Modification {
    /// Positional arguments for `add` / `mod`.
    pub args: Vec<String>,
    /// Note text to store instead of forwarding, if given.
    pub note: Option<Value>,
}

impl Modification {
    /// Translate properties into the tool's argument vocabulary.
    ///
    /// `key:value` attributes come first in insertion order, then non-blank
    /// tags, then the description. A `tags` value that is not a list is
    /// split on commas. `uuid` is dropped and `note` is set aside.
    pub fn from_properties(properties: &Properties) -> Self {
        let mut attributes = Vec::new();
        let mut tags = Vec::new();
        let mut description = None;
        let mut note = None;

        for (key, value) in properties.iter() {
            match key {
                UUID => {}
                NOTE => note = Some(value.clone()),
                DESCRIPTION => description = Some(value.to_string()),
                TAGS => match value {
                    Value::Tags(list) => {
                        tags.extend(list.iter().filter(|t| !t.trim().is_empty()).cloned());
                    }
                    other => tags.extend(
                        other
                            .to_string()
                            .split(',')
                            .map(str::trim)
                            .filter(|t| !t.is_empty())
                            .map(str::to_string),
                    ),
                },
                _ => attributes.push(format!("{key}:{value}")),
            }
        }

        attributes.extend(tags);
        attributes.extend(description);
        Self { args: attributes, note }
    }
}

#[derive(Debug)]
struct Cache {
    tasks: TaskCollection,
    loaded_at: SystemTime,
}

/// The task database facade.
#[derive(Debug)]
pub struct Database<'a> {
    tool: TaskTool<'a>,
    paths: DataPaths,
    notes: NoteStore,
    cache: Option<Cache>,
}

impl<'a> Database<'a> {
    /// Create a facade over `paths`, issuing requests through `tool`.
    pub fn new(tool: TaskTool<'a>, paths: DataPaths) -> Self {
        let notes = NoteStore::for_paths(&paths);
        Self { tool, paths, notes, cache: None }
    }

    /// Resolve the data folder from the tool, then create a facade.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] if the data folder cannot be
    /// determined.
    pub fn open(tool: TaskTool<'a>, config: &crate::config::Config) -> Result<Self> {
        let paths = DataPaths::resolve(config, &tool)?;
        Ok(Self::new(tool, paths))
    }

    /// The data folder in use.
    pub const fn paths(&self) -> &DataPaths {
        &self.paths
    }

    /// The note store in use.
    pub const fn notes(&self) -> &NoteStore {
        &self.notes
    }

    /// When the cached tasks were loaded, if they are loaded.
    pub fn loaded_at(&self) -> Option<SystemTime> {
        self.cache.as_ref().map(|cache| cache.loaded_at)
    }

    /// Whether `pending.data` changed after `since`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file's metadata cannot be read.
    pub fn modified_since(&self, since: SystemTime) -> Result<bool> {
        let modified = std::fs::metadata(self.paths.pending())?.modified()?;
        Ok(modified > since)
    }

    /// The cached tasks, loading them first if needed.
    ///
    /// # Errors
    ///
    /// Propagates load failures; the cache stays empty.
    pub fn get_tasks(&mut self) -> Result<&TaskCollection> {
        let cache = match self.cache.take() {
            Some(cache) => cache,
            None => {
                tracing::info!("Reloading tasks");
                // Stamped before reading so writes during the load count as newer.
                let loaded_at = SystemTime::now();
                let tasks = TaskCollection::load(&self.paths, &self.tool)?;
                Cache { tasks, loaded_at }
            }
        };
        Ok(&self.cache.insert(cache).tasks)
    }

    /// Discard the cache and load again.
    ///
    /// # Errors
    ///
    /// Propagates load failures.
    pub fn refresh(&mut self) -> Result<&TaskCollection> {
        self.cache = None;
        self.get_tasks()
    }

    /// Reload if `pending.data` changed since the cache was filled.
    ///
    /// Returns whether a reload happened.
    ///
    /// # Errors
    ///
    /// Propagates metadata and load failures.
    pub fn refresh_if_modified(&mut self) -> Result<bool> {
        let stale = match self.loaded_at() {
            Some(loaded_at) => self.modified_since(loaded_at)?,
            None => true,
        };
        if stale {
            self.refresh()?;
        }
        Ok(stale)
    }

    /// Distinct project names among the cached tasks.
    ///
    /// # Errors
    ///
    /// Propagates load failures.
    pub fn projects(&mut self) -> Result<Vec<String>> {
        Ok(self.get_tasks()?.projects().into_iter().map(str::to_string).collect())
    }

    /// Look a task up in a freshly loaded collection, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Propagates load failures.
    pub fn get_task_info(&self, uuid: &str) -> Result<Option<Task>> {
        Ok(TaskCollection::load(&self.paths, &self.tool)?.get(uuid).cloned())
    }

    /// Start a task.
    ///
    /// # Errors
    ///
    /// Propagates the tool's failure.
    pub fn start_task(&mut self, task_id: &str) -> Result<()> {
        tracing::info!(task = %task_id, "Starting task");
        self.request(&[task_id, "start"])
    }

    /// Stop a task.
    ///
    /// # Errors
    ///
    /// Propagates the tool's failure.
    pub fn stop_task(&mut self, task_id: &str) -> Result<()> {
        tracing::info!(task = %task_id, "Stopping task");
        self.request(&[task_id, "stop"])
    }

    /// Stop a task, then mark it done.
    ///
    /// # Errors
    ///
    /// Propagates the tool's failure; `done` is not sent if `stop` fails.
    pub fn finish_task(&mut self, task_id: &str) -> Result<()> {
        tracing::info!(task = %task_id, "Finishing task");
        self.request(&[task_id, "stop"])?;
        self.request(&[task_id, "done"])
    }

    /// Reopen a task and start it.
    ///
    /// # Errors
    ///
    /// Propagates the tool's failure.
    pub fn restart_task(&mut self, task_id: &str) -> Result<()> {
        tracing::info!(task = %task_id, "Restarting task");
        self.request(&[task_id, "mod", "status:pending"])?;
        self.request(&[task_id, "start"])
    }

    /// Modify a task. A `note` property goes to the note store.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidNote`] for a non-text note, or
    /// propagates the tool's or store's failure.
    pub fn update_task(&mut self, task_id: &str, properties: &Properties) -> Result<()> {
        tracing::info!(task = %task_id, "Updating task");
        let modification = Modification::from_properties(properties);

        if let Some(note) = &modification.note {
            Task::with_uuid(task_id).set_note_value(&self.notes, note)?;
        }
        if modification.args.is_empty() {
            return Ok(());
        }

        let mut args = vec![task_id, "mod"];
        args.extend(modification.args.iter().map(String::as_str));
        self.request(&args)
    }

    /// Create a task and return its uuid.
    ///
    /// Returns `None` if the tool's output does not report a created task.
    /// Once the task exists, a failure to store its note is logged and the
    /// uuid is still returned.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidNote`] for a non-text note, or
    /// propagates the tool's or store's failure.
    pub fn add_task(&mut self, properties: &Properties) -> Result<Option<String>> {
        tracing::info!("Adding task");
        let modification = Modification::from_properties(properties);
        if let Some(note) = &modification.note {
            if note.as_text().is_none() {
                return Err(crate::Error::InvalidNote(note.kind().to_string()));
            }
        }

        let mut args = vec!["add"];
        args.extend(modification.args.iter().map(String::as_str));
        let output = self.tool.run(&args)?;
        self.invalidate();

        let Some(number) = CREATED_TASK.captures(&output).and_then(|c| c.get(1)) else {
            tracing::warn!(output = %output.trim(), "Task tool did not report a created task");
            return Ok(None);
        };
        let uuid = self.tool.run(&[number.as_str(), "uuid"])?.trim().to_string();
        tracing::info!(uuid = %uuid, "New task uuid");

        if let Some(note) = &modification.note {
            if let Err(error) = Task::with_uuid(uuid.as_str()).set_note_value(&self.notes, note) {
                tracing::warn!(uuid = %uuid, %error, "Could not store the new task's note");
            }
        }
        Ok(Some(uuid))
    }

    fn request(&mut self, args: &[&str]) -> Result<()> {
        let result = self.tool.run(args).map(drop);
        self.invalidate();
        result
    }

    fn invalidate(&mut self) {
        self.cache = None;
    }
}
