//! HEC (HTTP Event Collector) endpoint implementations.
//!
//! HEC uses its own URL (typically port 8088) and its own token, sent with the
//! `Splunk` prefix rather than `Bearer`.
//!
//! # What this module handles:
//! - Batch event submission to `/services/collector/event` (newline-delimited)
//! - Health check queries to `/services/collector/health`
//!
//! # Invariants
//! - A batch is one request; it is accepted or rejected as a whole
//! - A 2xx response with a non-zero HEC code is an error

use reqwest::Client;

use crate::endpoints::send_request_with_retry;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::hec::{HecEvent, HecHealth, HecResponse};

const EVENT_PATH: &str = "/services/collector/event";
const HEALTH_PATH: &str = "/services/collector/health";

/// Send a batch of events to HEC.
///
/// # Arguments
/// * `client` - The HTTP client
/// * `hec_url` - The HEC base URL without trailing slash (e.g. `https://splunk:8088`)
/// * `hec_token` - The HEC token
/// * `events` - Events to send; an empty slice sends nothing
/// * `max_retries` - Maximum number of retry attempts
/// * `metrics` - Optional metrics collector
///
/// # Errors
/// - `ClientError::Rejected` when HEC answers with a non-zero code.
/// - `ClientError::MalformedResponse` when the answer is not an HEC response.
/// - Any error from [`send_request_with_retry`].
pub async fn send_batch(
    client: &Client,
    hec_url: &str,
    hec_token: &str,
    events: &[HecEvent],
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<HecResponse> {
    if events.is_empty() {
        return Ok(HecResponse {
            code: 0,
            text: "Success".to_string(),
            ack_id: None,
        });
    }

    let body = events
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ClientError::InvalidRequest(format!("Failed to serialize event: {e}")))?
        .join("\n");

    let builder = client
        .post(format!("{hec_url}{EVENT_PATH}"))
        .header("Authorization", format!("Splunk {hec_token}"))
        .header("Content-Type", "application/json")
        .body(body);

    let response = send_request_with_retry(builder, max_retries, "hec_event", metrics).await?;
    let text = response.text().await?;

    let hec_response: HecResponse =
        serde_json::from_str(&text).map_err(|e| ClientError::MalformedResponse {
            command: "hec_event",
            message: format!("not an HEC response: {e}"),
        })?;

    if !hec_response.is_success() {
        return Err(ClientError::Rejected {
            command: "hec_event",
            message: format!("{} ({})", hec_response.text, hec_response.description()),
        });
    }
    Ok(hec_response)
}

/// Check the HEC health endpoint.
///
/// # Errors
/// Returns `ClientError` if the request fails.
pub async fn health_check(
    client: &Client,
    hec_url: &str,
    hec_token: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<HecHealth> {
    let builder = client
        .get(format!("{hec_url}{HEALTH_PATH}"))
        .header("Authorization", format!("Splunk {hec_token}"));

    let response = send_request_with_retry(builder, max_retries, "hec_health", metrics).await?;
    let code = response.status().as_u16();
    let text = response.text().await?;

    // The endpoint answers either plain text or `{"text": "...", "code": 17}`.
    let text = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| v.get("text").and_then(|t| t.as_str()).map(str::to_string))
        .unwrap_or(text);

    Ok(HecHealth {
        text: text.trim().to_string(),
        code,
    })
}
