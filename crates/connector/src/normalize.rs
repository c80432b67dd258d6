//! Normalizer: vendor records to the canonical event schema.
//!
//! Responsibilities:
//! - Map each input type's vendor fields onto [`CanonicalEvent`].
//! - Derive a stable identifier so replays of the same record deduplicate.
//!
//! Does NOT handle:
//! - Emission or batching (see [`crate::sink`]).
//!
//! Invariants:
//! - `raw_fields` is the vendor record exactly as received, unknown fields included.
//! - The same record content at the same position among identical records of
//!   one fetch always yields the same `id`.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use lastpass_client::RawRecord;
use lastpass_config::{InputType, parse_vendor_time};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Namespace for canonical event identifiers.
const EVENT_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6c61_7374_7061_7373_8e1d_4b2a_9f03_c7d5);

/// Category of a canonical event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Reporting activity (logins, edits, admin actions).
    Activity,
    User,
    Group,
    SharedFolder,
}

impl EventType {
    pub const fn for_input(input: InputType) -> Self {
        match input {
            InputType::Events => EventType::Activity,
            InputType::Users => EventType::User,
            InputType::Groups => EventType::Group,
            InputType::SharedFolders => EventType::SharedFolder,
        }
    }
}

/// A vendor record in the common schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    /// Stable deduplication key.
    pub id: Uuid,
    pub input_type: InputType,
    /// When the event happened; the collection time for inventory records.
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    pub actor_user: Option<String>,
    pub target_resource: Option<String>,
    pub action: Option<String>,
    pub source_ip: Option<String>,
    pub raw_fields: Map<String, Value>,
    pub collected_at: DateTime<Utc>,
}

/// Record-level normalization failure. The record is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Record {record_id} has an invalid timestamp: {value:?}")]
    InvalidTimestamp { record_id: String, value: Option<String> },
}

/// Converts raw records into canonical events.
///
/// Vendor event timestamps carry no zone; `offset` says how to read them.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    offset: FixedOffset,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self { offset: Utc.fix() }
    }
}

impl Normalizer {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Normalize one record.
    ///
    /// # Errors
    /// `NormalizeError::InvalidTimestamp` when an activity event has a missing
    /// or unparseable `Time`.
    pub fn normalize(
        &self,
        record: &RawRecord,
        collected_at: DateTime<Utc>,
    ) -> Result<CanonicalEvent, NormalizeError> {
        self.normalize_occurrence(record, collected_at, 0)
    }

    /// Normalize the records of one fetch in order.
    ///
    /// Activity records with identical content (same user, action and
    /// second) are numbered by appearance, so genuine repeats keep distinct
    /// ids while a replayed window reproduces the same ones.
    pub fn normalize_all<'r>(
        &self,
        records: impl IntoIterator<Item = &'r RawRecord>,
        collected_at: DateTime<Utc>,
    ) -> Vec<Result<CanonicalEvent, NormalizeError>> {
        let mut seen: HashMap<Vec<u8>, usize> = HashMap::new();
        records
            .into_iter()
            .map(|record| {
                let occurrence = match record.input_type {
                    InputType::Events => {
                        let count = seen.entry(content_key(record)).or_default();
                        let occurrence = *count;
                        *count += 1;
                        occurrence
                    }
                    _ => 0,
                };
                self.normalize_occurrence(record, collected_at, occurrence)
            })
            .collect()
    }

    fn normalize_occurrence(
        &self,
        record: &RawRecord,
        collected_at: DateTime<Utc>,
        occurrence: usize,
    ) -> Result<CanonicalEvent, NormalizeError> {
        let input = record.input_type;
        let mut event = CanonicalEvent {
            id: record_id(record, occurrence),
            input_type: input,
            timestamp: collected_at,
            event_type: EventType::for_input(input),
            actor_user: None,
            target_resource: None,
            action: None,
            source_ip: None,
            raw_fields: record.fields.clone(),
            collected_at,
        };

        match input {
            InputType::Events => {
                let time = record.field_str("Time");
                event.timestamp = time
                    .as_deref()
                    .and_then(|t| parse_vendor_time(t, self.offset))
                    .ok_or_else(|| NormalizeError::InvalidTimestamp {
                        record_id: record.record_id.clone(),
                        value: time.clone(),
                    })?;
                event.actor_user = record.field_str("Username");
                event.source_ip = record.field_str("IP_Address");
                event.action = record.field_str("Action");
                event.target_resource = record.field_str("Data");
            }
            InputType::Users => {
                let username = record.field_str("username");
                event.actor_user = username.clone();
                event.target_resource = username;
                let disabled = record.fields.get("disabled").is_some_and(is_truthy);
                event.action = Some(if disabled { "disabled" } else { "active" }.to_string());
            }
            InputType::Groups => {
                event.target_resource = record
                    .field_str("groupname")
                    .or_else(|| Some(record.record_id.clone()));
                event.action = Some("membership".to_string());
            }
            InputType::SharedFolders => {
                event.target_resource = record
                    .field_str("sharedfoldername")
                    .or_else(|| Some(record.record_id.clone()));
                event.action = Some("acl".to_string());
            }
        }

        Ok(event)
    }
}

/// Normalize with UTC vendor timestamps.
pub fn normalize(
    record: &RawRecord,
    collected_at: DateTime<Utc>,
) -> Result<CanonicalEvent, NormalizeError> {
    Normalizer::default().normalize(record, collected_at)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        Value::String(s) => matches!(s.trim(), "1" | "true" | "True" | "TRUE"),
        _ => false,
    }
}

/// Activity keys (`Event1`...) are positional and change between queries, so
/// events are identified by content. Inventory records have vendor IDs.
fn record_id(record: &RawRecord, occurrence: usize) -> Uuid {
    let mut name = match record.input_type {
        InputType::Events => content_key(record),
        input => format!("{}:{}", input.as_str(), record.record_id).into_bytes(),
    };
    if occurrence > 0 {
        name.extend_from_slice(format!("#{occurrence}").as_bytes());
    }
    Uuid::new_v5(&EVENT_ID_NAMESPACE, &name)
}

/// Input type plus the record serialized with keys sorted at every level.
fn content_key(record: &RawRecord) -> Vec<u8> {
    let mut key = format!("{}:", record.input_type.as_str()).into_bytes();
    // serde_json maps are BTreeMaps here, so serialization is canonical.
    key.extend(serde_json::to_vec(&record.fields).unwrap_or_default());
    key
}
