//! HEC endpoint tests.
//!
//! # Invariants
//! - Requests carry `Authorization: Splunk <token>`
//! - A batch is sent as one newline-delimited body
//! - A non-zero HEC code is an error even on HTTP 200

mod common;

use common::*;
use lastpass_client::HecEvent;
use serde_json::json;
use wiremock::matchers::{header, method, path};

fn events() -> Vec<HecEvent> {
    vec![
        HecEvent::new(json!({"action": "Login"}))
            .with_index("main")
            .with_sourcetype("lastpass:activity")
            .with_time(1_709_290_800.0),
        HecEvent::new(json!({"action": "Log off"}))
            .with_index("main")
            .with_sourcetype("lastpass:activity"),
    ]
}

#[tokio::test]
async fn test_send_batch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/collector/event"))
        .and(header("Authorization", "Splunk hec-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("hec/success.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = endpoints::hec::send_batch(
        &Client::new(),
        &mock_server.uri(),
        "hec-token",
        &events(),
        0,
        None,
    )
    .await
    .unwrap();

    assert!(response.is_success());
    let requests = mock_server.received_requests().await.unwrap();
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["sourcetype"], "lastpass:activity");
    assert_eq!(first["event"]["action"], "Login");
}

#[tokio::test]
async fn test_non_zero_code_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/collector/event"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "Server is busy", "code": 9})))
        .mount(&mock_server)
        .await;

    let err = endpoints::hec::send_batch(
        &Client::new(),
        &mock_server.uri(),
        "hec-token",
        &events(),
        0,
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ClientError::Rejected { command: "hec_event", .. }));
}

#[tokio::test]
async fn test_invalid_token_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/collector/event"))
        .respond_with(ResponseTemplate::new(403).set_body_json(load_fixture("hec/invalid_token.json")))
        .mount(&mock_server)
        .await;

    let err = endpoints::hec::send_batch(
        &Client::new(),
        &mock_server.uri(),
        "wrong",
        &events(),
        3,
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ClientError::ApiError { status: 403, .. }));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_batch_sends_nothing() {
    let mock_server = MockServer::start().await;

    let response =
        endpoints::hec::send_batch(&Client::new(), &mock_server.uri(), "hec-token", &[], 0, None)
            .await
            .unwrap();

    assert!(response.is_success());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_health_check_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/collector/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"text": "HEC is healthy", "code": 17})),
        )
        .mount(&mock_server)
        .await;

    let client = LastPassClient::builder()
        .base_url("https://lastpass.com/enterpriseapi.php".to_string())
        .max_retries(0)
        .build()
        .unwrap();
    let health = client
        .hec_health_check(&mock_server.uri(), "hec-token")
        .await
        .unwrap();

    assert!(health.is_healthy());
    assert_eq!(health.text, "HEC is healthy");
}
