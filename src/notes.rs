//! Free-text notes stored next to the task database.
//!
//! Each note is a plain UTF-8 file at `<data folder>/notes/<uuid>`. A note
//! file only exists while its text is non-blank.

use crate::error::{Error, Result};
use crate::paths::DataPaths;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Reads and writes note files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteStore {
    dir: PathBuf,
}

impl NoteStore {
    /// Store notes under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store notes in the data folder's notes directory.
    pub fn for_paths(paths: &DataPaths) -> Self {
        Self::new(paths.notes_dir())
    }

    /// The notes directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the note file for `uuid`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] unless `uuid` is a single plain file
    /// name inside the notes directory.
    pub fn path(&self, uuid: &str) -> Result<PathBuf> {
        let mut components = Path::new(uuid).components();
        let plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !plain || uuid.contains(['/', '\\']) {
            return Err(Error::Precondition(format!("Invalid task uuid for a note: {uuid:?}")));
        }
        Ok(self.dir.join(uuid))
    }

    /// Read the note for `uuid`; empty if none exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] for an invalid uuid, or an error if
    /// the file exists but cannot be read as UTF-8.
    pub fn read(&self, uuid: &str) -> Result<String> {
        match fs::read_to_string(self.path(uuid)?) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the note for `uuid`, or delete it when `text` is blank.
    ///
    /// The notes directory is created on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] for an invalid uuid, or an error if
    /// the directory or file cannot be written.
    pub fn write(&self, uuid: &str, text: &str) -> Result<()> {
        let path = self.path(uuid)?;
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
            tracing::info!(path = %self.dir.display(), "Created notes folder");
        }

        if !text.trim().is_empty() {
            fs::write(&path, text)?;
            tracing::info!(path = %path.display(), "Wrote a note");
        } else if path.exists() {
            fs::remove_file(&path)?;
            tracing::info!(path = %path.display(), "Deleted a note file");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_note_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = NoteStore::new(dir.path().join("notes"));
        assert_eq!(store.read("abc").unwrap(), "");
    }

    #[test]
    fn test_write_creates_folder_and_file() {
        let dir = TempDir::new().unwrap();
        let store = NoteStore::new(dir.path().join("notes"));

        store.write("abc", "hello").unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("notes/abc")).unwrap(), "hello");
        assert_eq!(store.read("abc").unwrap(), "hello");
    }

    #[test]
    fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = NoteStore::new(dir.path());

        store.write("abc", "first").unwrap();
        store.write("abc", "second").unwrap();
        assert_eq!(store.read("abc").unwrap(), "second");
    }

    #[test]
    fn test_blank_write_deletes() {
        let dir = TempDir::new().unwrap();
        let store = NoteStore::new(dir.path());

        store.write("abc", "hello").unwrap();
        store.write("abc", " \n\t ").unwrap();
        assert!(!store.path("abc").unwrap().exists());
        assert_eq!(store.read("abc").unwrap(), "");
    }

    #[test]
    fn test_blank_write_without_file_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = NoteStore::new(dir.path().join("notes"));

        store.write("abc", "").unwrap();
        assert!(store.dir().exists());
        assert!(!store.path("abc").unwrap().exists());
    }

    #[test]
    fn test_uuid_outside_notes_dir_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pending.data"), "[uuid:\"a\"]\n").unwrap();
        let store = NoteStore::new(dir.path().join("notes"));

        for uuid in ["../pending.data", "..", ".", "", "a/b", "a\\b", "/etc/passwd", "abc/"] {
            assert!(
                matches!(store.write(uuid, "  "), Err(Error::Precondition(_))),
                "write accepted {uuid:?}"
            );
            assert!(
                matches!(store.read(uuid), Err(Error::Precondition(_))),
                "read accepted {uuid:?}"
            );
        }
        assert!(dir.path().join("pending.data").exists());
        assert!(!store.dir().exists());
    }

    #[test]
    fn test_unicode_note() {
        let dir = TempDir::new().unwrap();
        let store = NoteStore::new(dir.path());

        store.write("abc", "café ☕").unwrap();
        assert_eq!(store.read("abc").unwrap(), "café ☕");
    }
}
