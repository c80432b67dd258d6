//! Record extraction from command payloads.
//!
//! # Invariants
//! - Entries that are not JSON objects are reported as malformed, never dropped silently.
//! - A payload container of the wrong shape fails the whole page.
//! - Record fields are kept exactly as received.

use lastpass_config::InputType;
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};
use crate::models::{Command, MalformedRecord, Page, RawRecord};

/// Turn every entry of a keyed payload object into a record.
pub fn extract_object_entries(input: InputType, entries: &Map<String, Value>) -> Page {
    let mut page = Page::default();
    for (key, value) in entries {
        match value {
            Value::Object(fields) => page
                .records
                .push(RawRecord::new(input, key.clone(), fields.clone())),
            other => page.malformed.push(MalformedRecord {
                record_id: key.clone(),
                reason: format!("expected an object, found {}", json_kind(other)),
            }),
        }
    }
    page
}

/// Look up a payload container in a response body.
///
/// Missing, null and empty-array containers mean "no records".
pub fn payload_container<'a>(
    command: Command,
    body: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) if items.is_empty() => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(ClientError::MalformedResponse {
            command: command.as_str(),
            message: format!("'{key}' is {}, expected an object", json_kind(other)),
        }),
    }
}

/// Group entries map a group name to its member list.
///
/// Array entries are wrapped as `{"groupname", "members"}`; object entries are
/// kept as received.
pub fn extract_groups(entries: &Map<String, Value>) -> Page {
    let mut page = Page::default();
    for (name, value) in entries {
        match value {
            Value::Array(_) => {
                let mut fields = Map::new();
                fields.insert("groupname".to_string(), Value::String(name.clone()));
                fields.insert("members".to_string(), value.clone());
                page.records
                    .push(RawRecord::new(InputType::Groups, name.clone(), fields));
            }
            Value::Object(fields) => page.records.push(RawRecord::new(
                InputType::Groups,
                name.clone(),
                fields.clone(),
            )),
            other => page.malformed.push(MalformedRecord {
                record_id: name.clone(),
                reason: format!("expected a member list, found {}", json_kind(other)),
            }),
        }
    }
    page
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
