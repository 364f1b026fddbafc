//! All tasks from both database files, enriched with export data.

use crate::error::{Result, Warning};
use crate::merge::{merge_exported, ExportedTask};
use crate::parser::parse_database;
use crate::paths::DataPaths;
use crate::record::Record;
use crate::task::Task;
use crate::taskwarrior::TaskTool;
use std::path::Path;
use std::time::Instant;

/// Records read from a single database file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatabaseFile {
    /// Records in file order.
    pub records: Vec<Record>,
    /// Recoverable problems found while reading.
    pub warnings: Vec<Warning>,
}

/// Read one database file.
///
/// A missing file yields no records and a [`Warning::MissingDatabase`].
///
/// # Errors
///
/// Returns [`crate::Error::Format`] if any line is malformed; the file is
/// then rejected as a whole.
pub fn load_database_file(path: &Path) -> Result<DatabaseFile> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "Database does not exist");
        return Ok(DatabaseFile {
            records: Vec::new(),
            warnings: vec![Warning::MissingDatabase(path.to_path_buf())],
        });
    }

    let contents = std::fs::read(path)?;
    let (records, warnings) = parse_database(path, &contents)?;
    Ok(DatabaseFile { records, warnings })
}

/// Pending tasks followed by completed tasks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskCollection {
    tasks: Vec<Task>,
    warnings: Vec<Warning>,
}

impl TaskCollection {
    /// Load both database files and merge in the tool's export.
    ///
    /// # Errors
    ///
    /// Fails on a malformed database file, an export that is not valid
    /// JSON, or a failed tool invocation.
    pub fn load(paths: &DataPaths, tool: &TaskTool<'_>) -> Result<Self> {
        let started = Instant::now();

        let pending = load_database_file(&paths.pending())?;
        let completed = load_database_file(&paths.completed())?;
        let exported = crate::merge::parse_export(&tool.export()?)?;

        let collection = Self::from_files([pending, completed], &exported);
        tracing::info!(
            tasks = collection.len(),
            elapsed = ?started.elapsed(),
            "Task database read"
        );
        Ok(collection)
    }

    /// Build a collection from already-read files and export entries.
    pub fn from_files(
        files: impl IntoIterator<Item = DatabaseFile>,
        exported: &[ExportedTask],
    ) -> Self {
        let mut records = Vec::new();
        let mut warnings = Vec::new();
        for file in files {
            records.extend(file.records);
            warnings.extend(file.warnings);
        }

        warnings.extend(merge_exported(&mut records, exported));
        Self { tasks: records.into_iter().map(Task::new).collect(), warnings }
    }

    /// Find a task by uuid.
    pub fn get(&self, uuid: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.uuid() == Some(uuid))
    }

    /// Iterate over tasks in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether there are no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Distinct project names, in first-seen order.
    pub fn projects(&self) -> Vec<&str> {
        let mut projects: Vec<&str> = Vec::new();
        for project in self.tasks.iter().filter_map(|task| task.text("project")) {
            if !projects.contains(&project) {
                projects.push(project);
            }
        }
        projects
    }

    /// The task currently started, if any.
    pub fn active(&self) -> Option<&Task> {
        self.tasks.iter().find(|task| task.is_active())
    }

    /// Recoverable problems encountered while loading.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

impl<'a> IntoIterator for &'a TaskCollection {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
