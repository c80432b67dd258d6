//! LastPass Enterprise API request and response envelopes.
//!
//! Every call is a `POST` of `{cid, provhash, cmd, apiuser, data}` to a
//! single endpoint. Responses are JSON objects; most carry a `status` field
//! and command payload, `getsfdata` returns the folder map at top level.

use lastpass_config::InputType;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

/// Fields that are envelope metadata rather than payload.
const ENVELOPE_KEYS: [&str; 4] = ["status", "error", "next", "total"];

/// Enterprise API command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Reporting events for a time range.
    Reporting,
    /// Users and groups.
    GetUserData,
    /// Shared folders with their ACLs.
    GetSharedFolderData,
}

impl Command {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Command::Reporting => "reporting",
            Command::GetUserData => "getuserdata",
            Command::GetSharedFolderData => "getsfdata",
        }
    }

    /// The command that serves an input type.
    pub const fn for_input(input: InputType) -> Self {
        match input {
            InputType::Events => Command::Reporting,
            InputType::Users | InputType::Groups => Command::GetUserData,
            InputType::SharedFolders => Command::GetSharedFolderData,
        }
    }
}

/// Request body. Deliberately not `Debug`: it carries the provisioning hash.
#[derive(Serialize)]
pub struct RequestEnvelope<'a> {
    pub cid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provhash: Option<&'a str>,
    pub cmd: &'static str,
    pub apiuser: &'a str,
    pub data: Value,
}

/// `data` for the `reporting` command.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReportingQuery {
    pub from: String,
    pub to: String,
    pub user: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl ReportingQuery {
    pub fn new(from: String, to: String, next: Option<String>) -> Self {
        Self {
            from,
            to,
            user: "allusers",
            next,
        }
    }
}

/// `data` for the `getuserdata` command.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct UserDataQuery {
    pub pagesize: usize,
    pub pageindex: usize,
}

/// A parsed response envelope.
#[derive(Debug, Clone, Default)]
pub struct ApiResponse {
    pub status: Option<String>,
    pub error: Option<String>,
    /// Continuation token for the next reporting page.
    pub next: Option<String>,
    /// Total number of users for paged `getuserdata` calls.
    pub total: Option<u64>,
    /// Everything that is not envelope metadata.
    pub body: Map<String, Value>,
}

impl ApiResponse {
    /// Split a response object into envelope metadata and payload.
    pub fn from_value(command: Command, value: Value) -> Result<Self> {
        let Value::Object(mut body) = value else {
            return Err(ClientError::MalformedResponse {
                command: command.as_str(),
                message: "response is not a JSON object".to_string(),
            });
        };

        let status = body.get("status").and_then(Value::as_str).map(str::to_string);
        let error = body.get("error").and_then(error_text);
        let next = body
            .get("next")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let total = body.get("total").and_then(|v| match v {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });
        for key in ENVELOPE_KEYS {
            body.remove(key);
        }

        Ok(Self {
            status,
            error,
            next,
            total,
            body,
        })
    }

    /// Fail with `Rejected` unless the response reports success.
    ///
    /// A missing `status` is accepted when there is no `error` either.
    pub fn ensure_ok(&self, command: Command) -> Result<()> {
        let ok = match self.status.as_deref() {
            Some(status) => status.eq_ignore_ascii_case("OK"),
            None => self.error.is_none(),
        };
        if ok {
            return Ok(());
        }
        Err(ClientError::Rejected {
            command: command.as_str(),
            message: self
                .error
                .clone()
                .or_else(|| self.status.clone())
                .unwrap_or_else(|| "request failed".to_string()),
        })
    }
}

fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
                .collect::<Vec<_>>()
                .join("; "),
        ),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_serialization_omits_missing_hash() {
        let envelope = RequestEnvelope {
            cid: "8771312",
            provhash: None,
            cmd: Command::Reporting.as_str(),
            apiuser: "splunk.collector",
            data: json!({}),
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["cmd"], "reporting");
        assert!(value.get("provhash").is_none());
    }

    #[test]
    fn test_reporting_query_shape() {
        let query = ReportingQuery::new(
            "2024-03-01 00:00:00".to_string(),
            "2024-03-01 23:59:59".to_string(),
            None,
        );
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"from": "2024-03-01 00:00:00", "to": "2024-03-01 23:59:59", "user": "allusers"})
        );
    }

    #[test]
    fn test_response_splits_metadata() {
        let response = ApiResponse::from_value(
            Command::Reporting,
            json!({"status": "OK", "next": "abc", "data": {"Event1": {}}}),
        )
        .unwrap();
        assert_eq!(response.next.as_deref(), Some("abc"));
        assert!(response.body.contains_key("data"));
        assert!(!response.body.contains_key("status"));
        assert!(response.ensure_ok(Command::Reporting).is_ok());
    }

    #[test]
    fn test_fail_status_is_rejected() {
        let response = ApiResponse::from_value(
            Command::Reporting,
            json!({"status": "FAIL", "error": ["Invalid date range"]}),
        )
        .unwrap();
        match response.ensure_ok(Command::Reporting) {
            Err(ClientError::Rejected { message, .. }) => {
                assert_eq!(message, "Invalid date range")
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_status_is_ok_for_getsfdata() {
        let response = ApiResponse::from_value(
            Command::GetSharedFolderData,
            json!({"101": {"sharedfoldername": "Finance"}}),
        )
        .unwrap();
        assert!(response.ensure_ok(Command::GetSharedFolderData).is_ok());
        assert!(response.body.contains_key("101"));
    }

    #[test]
    fn test_non_object_response_is_malformed() {
        assert!(matches!(
            ApiResponse::from_value(Command::Reporting, json!([1, 2])),
            Err(ClientError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_total_accepts_string() {
        let response =
            ApiResponse::from_value(Command::GetUserData, json!({"total": "12", "Users": {}}))
                .unwrap();
        assert_eq!(response.total, Some(12));
    }
}
