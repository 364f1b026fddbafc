//! The task entity: a record plus derived state and note access.

use crate::error::{Error, Result};
use crate::notes::NoteStore;
use crate::record::{Record, Value, START};
use std::fmt;
use std::ops::Deref;

/// A task read from the database.
///
/// Field access goes through the wrapped [`Record`] via `Deref`; the record
/// cannot be modified through a `Task`, so the uuid never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    record: Record,
}

impl Task {
    /// Wrap a record.
    pub const fn new(record: Record) -> Self {
        Self { record }
    }

    /// A task that only knows its identifier.
    pub fn with_uuid(uuid: impl Into<String>) -> Self {
        let mut record = Record::new();
        record.insert(crate::record::UUID, uuid.into());
        Self { record }
    }

    /// The underlying record.
    pub const fn record(&self) -> &Record {
        &self.record
    }

    /// Whether the task is currently started.
    pub fn is_active(&self) -> bool {
        self.record.text(START).is_some_and(|start| !start.is_empty())
    }

    /// Seconds since the task was started, or 0 if it is not active.
    pub fn current_runtime(&self) -> u64 {
        self.runtime_at(chrono::Utc::now().timestamp())
    }

    /// Seconds between the start time and `now` (epoch seconds).
    pub fn runtime_at(&self, now: i64) -> u64 {
        let Some(start) = self.record.text(START).filter(|s| !s.is_empty()) else {
            return 0;
        };
        match start.trim().parse::<i64>() {
            Ok(start) => u64::try_from(now.saturating_sub(start)).unwrap_or(0),
            Err(_) => {
                tracing::debug!(start = %start, "Start time is not an epoch timestamp");
                0
            }
        }
    }

    /// The current runtime as `H:MM:SS`.
    pub fn formatted_runtime(&self) -> String {
        format_runtime(self.current_runtime())
    }

    /// Read the task's note.
    ///
    /// Returns `None` for a task without a uuid, and an empty string for a
    /// task that has no note yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the note file cannot be read.
    pub fn note(&self, store: &NoteStore) -> Result<Option<String>> {
        self.record.uuid().map(|uuid| store.read(uuid)).transpose()
    }

    /// Replace the task's note. Blank text deletes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] if the task has no uuid, or an I/O
    /// error from the store.
    pub fn set_note(&self, store: &NoteStore, text: &str) -> Result<()> {
        let Some(uuid) = self.record.uuid() else {
            return Err(Error::Precondition(
                "Cannot set a note for an unsaved task (no uuid).".to_string(),
            ));
        };
        if store.read(uuid)? == text {
            return Ok(());
        }
        store.write(uuid, text)
    }

    /// Replace the task's note from a property value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNote`] if `value` is not text, otherwise as
    /// [`Task::set_note`].
    pub fn set_note_value(&self, store: &NoteStore, value: &Value) -> Result<()> {
        let text = value.as_text().ok_or_else(|| Error::InvalidNote(value.kind().to_string()))?;
        self.set_note(store, text)
    }
}

impl Deref for Task {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.record
    }
}

impl From<Record> for Task {
    fn from(record: Record) -> Self {
        Self::new(record)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let uuid = self.uuid().unwrap_or("-");
        let short: String = uuid.chars().take(8).collect();
        write!(f, "<Task {short}, status={}", self.text("status").unwrap_or("-"))?;
        if let Some(project) = self.text("project") {
            write!(f, ", pro:{project}")?;
        }
        if let Some(priority) = self.text("priority") {
            write!(f, ", pri:{priority}")?;
        }
        if self.is_active() {
            write!(f, ", dur:{}", self.formatted_runtime())?;
        }
        f.write_str(">")
    }
}

/// Format seconds as `H:MM:SS`.
///
/// Hours wrap at 60, so a task running for 61 hours shows `1:00:00`.
pub fn format_runtime(seconds: u64) -> String {
    let hours = (seconds / 3600) % 60;
    let minutes = (seconds / 60) % 60;
    let secs = seconds % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}
