//! Checkpoint storage backends.
//!
//! Responsibilities:
//! - Persist one opaque checkpoint document per input type.
//! - Make writes atomic so a crash never leaves a half-written checkpoint.
//!
//! Does NOT handle:
//! - Checkpoint format, migration or monotonicity (see [`super::CheckpointTracker`]).

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use lastpass_config::InputType;

use super::CheckpointError;

/// Key-value storage for checkpoint documents.
pub trait CheckpointStore: Send + Sync {
    /// Read the stored document, `None` when nothing was written yet.
    fn read(&self, input: InputType) -> Result<Option<String>, CheckpointError>;

    /// Replace the stored document atomically.
    fn write(&self, input: InputType, document: &str) -> Result<(), CheckpointError>;

    /// Delete the stored document. Returns whether one existed.
    fn delete(&self, input: InputType) -> Result<bool, CheckpointError>;

    /// Move an unreadable document out of the way, returning where it went.
    ///
    /// The default drops it.
    fn backup_corrupt(
        &self,
        input: InputType,
        _at: DateTime<Utc>,
    ) -> Result<Option<PathBuf>, CheckpointError> {
        self.delete(input)?;
        Ok(None)
    }
}

/// One `<input>.json` file per input type under a directory.
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    dir: PathBuf,
}

impl FileCheckpointStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the checkpoint file for `input`.
    pub fn path_for(&self, input: InputType) -> PathBuf {
        self.dir.join(format!("{}.json", input.as_str()))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> CheckpointError {
    CheckpointError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn read(&self, input: InputType) -> Result<Option<String>, CheckpointError> {
        let path = self.path_for(input);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn write(&self, input: InputType, document: &str) -> Result<(), CheckpointError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        let path = self.path_for(input);
        let temp_path = path.with_extension("json.tmp");
        {
            let mut file = std::fs::File::create(&temp_path).map_err(|e| io_error(&temp_path, e))?;
            file.write_all(document.as_bytes())
                .map_err(|e| io_error(&temp_path, e))?;
            file.sync_all().map_err(|e| io_error(&temp_path, e))?;
        }
        std::fs::rename(&temp_path, &path).map_err(|e| io_error(&path, e))?;

        tracing::debug!(path = %path.display(), "Checkpoint written");
        Ok(())
    }

    fn delete(&self, input: InputType) -> Result<bool, CheckpointError> {
        let path = self.path_for(input);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn backup_corrupt(
        &self,
        input: InputType,
        at: DateTime<Utc>,
    ) -> Result<Option<PathBuf>, CheckpointError> {
        let path = self.path_for(input);
        // `<input>.json` becomes `<input>.corrupt.<ts>`
        let backup_path = path.with_extension(format!("corrupt.{}", at.timestamp()));
        std::fs::rename(&path, &backup_path).map_err(|e| io_error(&path, e))?;
        Ok(Some(backup_path))
    }
}

/// In-process store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    documents: Mutex<HashMap<InputType, String>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<InputType, String>> {
        // A panic while holding the lock cannot leave a map half-updated.
        self.documents
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn read(&self, input: InputType) -> Result<Option<String>, CheckpointError> {
        Ok(self.lock().get(&input).cloned())
    }

    fn write(&self, input: InputType, document: &str) -> Result<(), CheckpointError> {
        self.lock().insert(input, document.to_string());
        Ok(())
    }

    fn delete(&self, input: InputType) -> Result<bool, CheckpointError> {
        Ok(self.lock().remove(&input).is_some())
    }
}
