//! Scheduler loop tests.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use lastpass_connector::Scheduler;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};

async fn mount_failing_events_and_ok_users(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_partial_json(json!({"cmd": "reporting"})))
        .respond_with(ResponseTemplate::new(503))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_partial_json(json!({"cmd": "getuserdata"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("userdata/getuserdata.json")),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_failing_input_does_not_stop_others() {
    let server = MockServer::start().await;
    mount_failing_events_and_ok_users(&server).await;

    let (connector, sink, _tracker) = connector_with(client_for(&server, 0));
    let scheduler = Scheduler::new(
        Arc::new(connector),
        vec![InputType::Events, InputType::Users],
        Duration::from_secs(300),
    );

    let results = scheduler.run_cycle(&CancellationToken::new()).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, InputType::Events);
    assert!(matches!(results[0].1, Err(ConnectorError::Transient(_))));
    assert_eq!(results[1].0, InputType::Users);
    assert_eq!(results[1].1.as_ref().unwrap().emitted, 2);
    assert_eq!(sink.len(), 2);
}

#[tokio::test]
async fn test_run_stops_on_cancel() {
    let server = MockServer::start().await;
    mount_failing_events_and_ok_users(&server).await;

    let (connector, _sink, tracker) = connector_with(client_for(&server, 0));
    let scheduler = Scheduler::new(
        Arc::new(connector),
        vec![InputType::Events, InputType::Users],
        Duration::from_secs(3600),
    );
    let cancel = CancellationToken::new();

    let stopper = async {
        while tracker.load(InputType::Users).unwrap().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        cancel.cancel();
    };
    let (cycles, ()) = tokio::time::timeout(
        Duration::from_secs(10),
        async { tokio::join!(scheduler.run(&cancel), stopper) },
    )
    .await
    .expect("scheduler stops after cancellation");

    assert_eq!(cycles, 1);
}

#[tokio::test]
async fn test_cancelled_cycle_skips_remaining_inputs() {
    let server = MockServer::start().await;
    let (connector, _sink, _tracker) = connector_with(client_for(&server, 0));
    let scheduler = Scheduler::new(
        Arc::new(connector),
        vec![InputType::Events, InputType::Users],
        Duration::from_secs(300),
    );
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert!(scheduler.run_cycle(&cancel).await.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}
