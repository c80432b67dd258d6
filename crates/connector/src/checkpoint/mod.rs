//! Checkpoint Tracker: persisted fetch position per input type.
//!
//! Responsibilities:
//! - Load the cursor for an input type, recovering from missing, corrupt and
//!   legacy checkpoint files.
//! - Advance the cursor only forward in time.
//! - Reset a checkpoint on operator request.
//!
//! Does NOT handle:
//! - Deciding the new cursor position (see [`crate::orchestrator`]).
//!
//! Invariants:
//! - A stored timestamp position never moves backward.
//! - A corrupt checkpoint is preserved as `<input>.corrupt.<ts>` before it is
//!   treated as empty.

mod store;

pub use store::{CheckpointStore, FileCheckpointStore, MemoryCheckpointStore};

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use lastpass_client::{CursorPosition, FetchCursor};
use lastpass_config::InputType;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised by checkpoint storage and validation.
#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("Checkpoint I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize checkpoint: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The proposed position is earlier than the stored one.
    #[error("Checkpoint for {input} would move backward from {stored} to {proposed}")]
    Regression {
        input: InputType,
        stored: DateTime<Utc>,
        proposed: DateTime<Utc>,
    },

    #[error("Cursor for {actual} cannot be stored as the {expected} checkpoint")]
    InputMismatch {
        expected: InputType,
        actual: InputType,
    },
}

/// Stored checkpoint as found on disk, without recovery applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckpointState {
    Missing,
    Current { cursor: FetchCursor },
    /// Pre-cursor format; migrated on the next load.
    Legacy { cursor: FetchCursor },
    /// Unreadable; backed up and discarded on the next load.
    Corrupt { reason: String },
}

/// Reads, migrates and advances checkpoints on top of a [`CheckpointStore`].
#[derive(Clone)]
pub struct CheckpointTracker {
    store: Arc<dyn CheckpointStore>,
}

impl std::fmt::Debug for CheckpointTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckpointTracker").finish_non_exhaustive()
    }
}

/// What a stored document turned out to be.
enum Parsed {
    Current(FetchCursor),
    Legacy(FetchCursor),
    Corrupt(String),
}

impl CheckpointTracker {
    pub fn new(store: Arc<dyn CheckpointStore>) -> Self {
        Self { store }
    }

    /// Tracker over `<dir>/<input>.json` files.
    pub fn file(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileCheckpointStore::new(dir)))
    }

    /// Tracker that keeps checkpoints in memory only.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCheckpointStore::new()))
    }

    /// Load the cursor for `input`.
    ///
    /// - Missing checkpoint: empty cursor.
    /// - Corrupt checkpoint: backed up, logged, empty cursor.
    /// - Legacy checkpoint (bare epoch or `time_curr` object): migrated and
    ///   rewritten in the current format.
    ///
    /// # Errors
    /// Storage failures only; unreadable content never fails a load.
    pub fn load(&self, input: InputType) -> Result<FetchCursor, CheckpointError> {
        let Some(document) = self.store.read(input)? else {
            return Ok(FetchCursor::empty(input));
        };

        match parse_document(input, &document) {
            Parsed::Current(cursor) => Ok(cursor),
            Parsed::Legacy(cursor) => {
                info!(
                    input = input.as_str(),
                    last_seen = ?cursor.last_seen,
                    "Migrating legacy checkpoint"
                );
                self.store
                    .write(input, &serde_json::to_string_pretty(&cursor)?)?;
                Ok(cursor)
            }
            Parsed::Corrupt(reason) => {
                let backup = self.store.backup_corrupt(input, Utc::now())?;
                warn!(
                    input = input.as_str(),
                    reason = %reason,
                    backup = ?backup,
                    "Checkpoint unreadable, starting from an empty cursor"
                );
                Ok(FetchCursor::empty(input))
            }
        }
    }

    /// Report what is stored for `input` without migrating or backing it up.
    pub fn inspect(&self, input: InputType) -> Result<CheckpointState, CheckpointError> {
        let Some(document) = self.store.read(input)? else {
            return Ok(CheckpointState::Missing);
        };
        Ok(match parse_document(input, &document) {
            Parsed::Current(cursor) => CheckpointState::Current { cursor },
            Parsed::Legacy(cursor) => CheckpointState::Legacy { cursor },
            Parsed::Corrupt(reason) => CheckpointState::Corrupt { reason },
        })
    }

    /// Persist `cursor` as the new position for `input`.
    ///
    /// # Errors
    /// - `CheckpointError::InputMismatch` if the cursor belongs to another input.
    /// - `CheckpointError::Regression` if its timestamp is earlier than the stored one.
    pub fn advance(&self, input: InputType, cursor: &FetchCursor) -> Result<(), CheckpointError> {
        if cursor.input_type != input {
            return Err(CheckpointError::InputMismatch {
                expected: input,
                actual: cursor.input_type,
            });
        }

        let stored = match self.store.read(input)? {
            Some(document) => match parse_document(input, &document) {
                Parsed::Current(c) | Parsed::Legacy(c) => c.last_timestamp(),
                Parsed::Corrupt(_) => None,
            },
            None => None,
        };
        if let (Some(stored), Some(proposed)) = (stored, cursor.last_timestamp())
            && proposed < stored
        {
            return Err(CheckpointError::Regression {
                input,
                stored,
                proposed,
            });
        }

        self.store
            .write(input, &serde_json::to_string_pretty(cursor)?)
    }

    /// Delete the checkpoint for `input`. Returns whether one existed.
    pub fn reset(&self, input: InputType) -> Result<bool, CheckpointError> {
        let existed = self.store.delete(input)?;
        info!(input = input.as_str(), existed, "Checkpoint reset");
        Ok(existed)
    }
}

fn parse_document(input: InputType, document: &str) -> Parsed {
    let value: Value = match serde_json::from_str(document.trim()) {
        Ok(value) => value,
        Err(e) => return Parsed::Corrupt(e.to_string()),
    };

    if value.get("input_type").is_some() {
        return match serde_json::from_value::<FetchCursor>(value) {
            Ok(cursor) if cursor.input_type == input => Parsed::Current(cursor),
            Ok(cursor) => Parsed::Corrupt(format!(
                "checkpoint belongs to input '{}'",
                cursor.input_type
            )),
            Err(e) => Parsed::Corrupt(e.to_string()),
        };
    }

    match legacy_cursor(input, &value) {
        Some(cursor) => Parsed::Legacy(cursor),
        None => Parsed::Corrupt("unrecognized checkpoint format".to_string()),
    }
}

/// Older checkpoints stored epoch seconds, either bare or as
/// `{"time_curr", "time_start", "time_end"}`.
fn legacy_cursor(input: InputType, value: &Value) -> Option<FetchCursor> {
    let mut cursor = FetchCursor::empty(input);
    match value {
        Value::Object(fields) => {
            let current = epoch(fields.get("time_curr")?)?;
            cursor.last_seen = Some(CursorPosition::Timestamp(current));
            cursor.window_start = fields.get("time_start").and_then(epoch);
            cursor.window_end = fields.get("time_end").and_then(epoch);
        }
        other => {
            cursor.last_seen = Some(CursorPosition::Timestamp(epoch(other)?));
        }
    }
    Some(cursor)
}

fn epoch(value: &Value) -> Option<DateTime<Utc>> {
    let seconds = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Utc.timestamp_opt(seconds.trunc() as i64, 0).single()
}
