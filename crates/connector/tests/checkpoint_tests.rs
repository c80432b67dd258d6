//! File-backed checkpoint recovery through a full tick.
//!
//! # Invariants
//! - A corrupt checkpoint is preserved next to the original and collection restarts
//! - A legacy epoch checkpoint is honored as the resume position

mod common;

use std::sync::Arc;

use common::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};

fn file_connector(server: &MockServer, dir: &TempDir) -> (Connector, MemorySink) {
    let sink = MemorySink::new();
    let connector = Connector::new(
        Arc::new(client_for(server, 0)),
        resolver(),
        CheckpointTracker::file(dir.path()),
        Box::new(sink.clone()),
    );
    (connector, sink)
}

#[tokio::test]
async fn test_corrupt_checkpoint_restarts_from_lookback() {
    let server = MockServer::start().await;
    // No checkpoint and no configured start: the last 24 hours.
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_partial_json(json!({"data": {"from": "2024-02-29 12:00:00"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(reporting_body(&[activity(
            "2024-03-01 11:10:00",
            "alice@example.com",
            "Login",
        )])))
        .expect(1)
        .with_priority(1)
        .mount(&server)
        .await;
    // The range ends with a one-second window at `now`.
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("reporting/empty.json")),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("events.json"), "{\"input_type\": \"events\", ").unwrap();
    let (connector, sink) = file_connector(&server, &dir);

    connector
        .run_tick_at(InputType::Events, at(12, 0, 0), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(sink.len(), 1);
    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(names.iter().any(|n| n.starts_with("events.corrupt.")), "{names:?}");

    let stored: FetchCursor =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("events.json")).unwrap())
            .unwrap();
    assert_eq!(stored.last_timestamp(), Some(at(11, 10, 0)));
}

#[tokio::test]
async fn test_legacy_checkpoint_sets_resume_point() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_partial_json(json!({"data": {"from": "2024-03-01 11:00:00"}})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("reporting/empty.json")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("events.json"),
        r#"{"time_curr": 1709290800, "time_start": 1709287200, "time_end": 1709290800}"#,
    )
    .unwrap();
    let (connector, _sink) = file_connector(&server, &dir);

    let report = connector
        .run_tick_at(InputType::Events, at(12, 0, 0), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.cursor.last_timestamp(), Some(at(11, 0, 0)));
    let stored: FetchCursor =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("events.json")).unwrap())
            .unwrap();
    assert_eq!(stored.input_type, InputType::Events);
    assert_eq!(stored.window_end, Some(at(12, 0, 0)));
}

#[tokio::test]
async fn test_reset_restarts_collection() {
    let dir = TempDir::new().unwrap();
    let tracker = CheckpointTracker::file(dir.path());
    seed_events_cursor(&tracker, at(11, 0, 0));
    assert!(dir.path().join("events.json").exists());

    assert!(tracker.reset(InputType::Events).unwrap());
    assert!(tracker.load(InputType::Events).unwrap().is_empty());
    assert!(!dir.path().join("events.json").exists());
}
