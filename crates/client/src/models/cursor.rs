//! Persisted fetch position per input type.

use chrono::{DateTime, Utc};
use lastpass_config::InputType;
use serde::{Deserialize, Serialize};

/// Where the last successful tick stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CursorPosition {
    /// Latest emitted event time (events) or snapshot time (inventory inputs).
    Timestamp(DateTime<Utc>),
    /// Opaque vendor continuation token.
    Token(String),
}

impl CursorPosition {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            Self::Token(_) => None,
        }
    }
}

/// Resumable fetch position for one input type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchCursor {
    pub input_type: InputType,
    /// `None` means nothing has been collected yet.
    #[serde(default)]
    pub last_seen: Option<CursorPosition>,
    /// Start of the range queried by the last successful tick.
    #[serde(default)]
    pub window_start: Option<DateTime<Utc>>,
    /// End of the range queried by the last successful tick.
    #[serde(default)]
    pub window_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FetchCursor {
    /// A cursor for an input that has never been collected.
    pub fn empty(input_type: InputType) -> Self {
        Self {
            input_type,
            last_seen: None,
            window_start: None,
            window_end: None,
            updated_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_none()
    }

    /// The stored position as a timestamp, if it is one.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.last_seen.as_ref().and_then(CursorPosition::timestamp)
    }
}
