//! Retry behavior tests.
//!
//! # Invariants
//! - 429 and 5xx trigger retry with `2^attempt` second backoff
//! - A `Retry-After` delta-seconds header replaces the computed backoff
//! - Other 4xx statuses fail immediately
//! - Exhaustion reports the attempt count and the last error

mod common;

use common::*;
use lastpass_client::endpoints::{ApiContext, post_command};
use lastpass_client::models::Command;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};

async fn post_reporting(url: String, max_retries: usize) -> Result<(), ClientError> {
    let http = Client::new();
    let credential = credential();
    let ctx = ApiContext {
        http: &http,
        url: &url,
        api_user: "splunk.collector",
        auth: AuthStrategy::ProvisioningHash,
        credential: &credential,
        max_retries,
        metrics: None,
    };
    post_command(ctx, Command::Reporting, json!({"from": "a", "to": "b"}))
        .await
        .map(|_| ())
}

async fn mount_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("reporting/empty.json")))
        .mount(server)
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_retry_on_429_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_ok(&mock_server).await;

    let handle = tokio::spawn(post_reporting(api_url(&mock_server), 3));

    assert_pending(&handle, "first 429 should wait for backoff").await;
    advance_and_yield(Duration::from_secs(1)).await;
    assert_pending(&handle, "second 429 should wait for a longer backoff").await;
    advance_and_yield(Duration::from_secs(2)).await;

    let result = handle.await.expect("reporting task");
    assert!(result.is_ok(), "expected success after two 429s: {result:?}");
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_retry_after_header_overrides_backoff() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_ok(&mock_server).await;

    let started = tokio::time::Instant::now();
    post_reporting(api_url(&mock_server), 3).await.unwrap();

    assert!(started.elapsed() >= Duration::from_secs(7));
}

#[tokio::test(start_paused = true)]
async fn test_5xx_exhaustion_reports_last_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = post_reporting(api_url(&mock_server), 2).await.unwrap_err();

    match err {
        ClientError::MaxRetriesExceeded(attempts, inner) => {
            assert_eq!(attempts, 3);
            assert!(matches!(
                *inner,
                ClientError::RetryableStatus { status: 503, .. }
            ));
        }
        other => panic!("expected MaxRetriesExceeded, got {other:?}"),
    }
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_400_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad envelope"))
        .mount(&mock_server)
        .await;

    let err = post_reporting(api_url(&mock_server), 3).await.unwrap_err();

    assert!(matches!(err, ClientError::ApiError { status: 400, .. }));
    assert!(!err.is_retryable());
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_zero_retries_means_single_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let err = post_reporting(api_url(&mock_server), 0).await.unwrap_err();

    assert!(matches!(err, ClientError::MaxRetriesExceeded(1, _)));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_non_ok_status_is_rejected_without_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("errors/rejected.json")))
        .mount(&mock_server)
        .await;

    let err = post_reporting(api_url(&mock_server), 3).await.unwrap_err();

    assert!(matches!(err, ClientError::Rejected { command: "reporting", .. }));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}
