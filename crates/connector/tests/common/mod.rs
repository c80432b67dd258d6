//! Shared helpers for connector integration tests.
//!
//! # Invariants
//! - The mock enterprise API is mounted at [`API_PATH`]
//! - Connectors built here use an in-memory sink the test keeps a handle to

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use lastpass_client::LastPassClient;
use lastpass_config::{CredentialResolver, SecureValue};
use secrecy::SecretString;
use serde_json::{Map, Value, json};

#[allow(unused_imports)]
pub use lastpass_client::testing::load_fixture;
#[allow(unused_imports)]
pub use lastpass_client::{CursorPosition, FetchCursor};
#[allow(unused_imports)]
pub use lastpass_config::InputType;
#[allow(unused_imports)]
pub use lastpass_connector::{
    CancellationToken, CheckpointTracker, Connector, ConnectorError, MemorySink,
};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_PATH: &str = "/enterpriseapi.php";

pub fn resolver() -> CredentialResolver {
    CredentialResolver::new(
        Some("8771312".to_string()),
        Some(SecureValue::Plain(SecretString::new("abc123def456".into()))),
    )
}

pub fn api_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), API_PATH)
}

#[allow(dead_code)]
pub fn client_for(server: &MockServer, max_retries: usize) -> LastPassClient {
    LastPassClient::builder()
        .base_url(api_url(server))
        .max_retries(max_retries)
        .build()
        .expect("client builds")
}

/// A connector over `client` with in-memory checkpoints, plus handles to its
/// sink and tracker.
#[allow(dead_code)]
pub fn connector_with(client: LastPassClient) -> (Connector, MemorySink, CheckpointTracker) {
    let sink = MemorySink::new();
    let tracker = CheckpointTracker::in_memory();
    let connector = Connector::new(
        Arc::new(client),
        resolver(),
        tracker.clone(),
        Box::new(sink.clone()),
    );
    (connector, sink, tracker)
}

#[allow(dead_code)]
pub fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, second).unwrap()
}

/// Store an events checkpoint at `ts`.
#[allow(dead_code)]
pub fn seed_events_cursor(tracker: &CheckpointTracker, ts: DateTime<Utc>) -> FetchCursor {
    let cursor = FetchCursor {
        last_seen: Some(CursorPosition::Timestamp(ts)),
        ..FetchCursor::empty(InputType::Events)
    };
    tracker.advance(InputType::Events, &cursor).unwrap();
    cursor
}

/// A `reporting` body with explicit events, given oldest first.
#[allow(dead_code)]
pub fn reporting_body(events: &[Value]) -> Value {
    let mut data = Map::new();
    for (i, event) in events.iter().enumerate() {
        data.insert(format!("Event{}", events.len() - i), event.clone());
    }
    json!({"status": "OK", "data": Value::Object(data)})
}

#[allow(dead_code)]
pub fn activity(time: &str, user: &str, action: &str) -> Value {
    json!({
        "Time": time,
        "Username": user,
        "IP_Address": "198.51.100.4",
        "Action": action,
        "Data": ""
    })
}
