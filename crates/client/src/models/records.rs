//! Raw vendor records and fetch results.

use lastpass_config::InputType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::cursor::FetchCursor;

/// One vendor record as received, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub input_type: InputType,
    /// Key of the record in the vendor payload (`Event3`, a user ID, a folder ID, a group name).
    pub record_id: String,
    /// Vendor fields, unknown ones included.
    pub fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new(input_type: InputType, record_id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            input_type,
            record_id: record_id.into(),
            fields,
        }
    }

    /// String value of a field, trimmed; numbers are rendered as text.
    pub fn field_str(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// A payload entry that could not be turned into a `RawRecord`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    pub record_id: String,
    pub reason: String,
}

/// Records extracted from one response page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub records: Vec<RawRecord>,
    pub malformed: Vec<MalformedRecord>,
}

/// Everything one `fetch` produced for an input type.
#[derive(Debug, Clone)]
pub struct FetchBatch {
    pub records: Vec<RawRecord>,
    pub malformed: Vec<MalformedRecord>,
    /// Cursor describing the queried range.
    ///
    /// For snapshot inputs `last_seen` is the fetch time. For events it is the
    /// stored position; the caller moves it to the latest emitted timestamp.
    pub next_cursor: FetchCursor,
    /// Number of response pages consumed.
    pub pages: usize,
}

impl FetchBatch {
    /// Total number of payload entries seen, valid or not.
    pub fn total_entries(&self) -> usize {
        self.records.len() + self.malformed.len()
    }
}
