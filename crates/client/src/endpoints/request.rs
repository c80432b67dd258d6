//! Retry helper for HTTP requests with exponential backoff.
//!
//! Network errors, HTTP 429 and HTTP 5xx responses are retried with
//! `2^attempt` second backoff (capped, `Retry-After` wins when present).
//! Every other non-success status fails immediately.

use std::time::{Duration, Instant};

use lastpass_config::constants::MAX_BACKOFF_SECS;
use reqwest::{RequestBuilder, Response};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;

/// Longest error body kept in `ClientError::ApiError`.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Backoff before retry number `attempt + 1`.
pub fn backoff_for(attempt: usize, retry_after: Option<Duration>) -> Duration {
    let cap = Duration::from_secs(MAX_BACKOFF_SECS);
    match retry_after {
        Some(delay) => delay.min(cap),
        None => Duration::from_secs(2u64.saturating_pow(attempt as u32)).min(cap),
    }
}

fn parse_retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Sends an HTTP request with automatic retry of transient failures.
///
/// # Arguments
///
/// * `builder` - The `reqwest::RequestBuilder` to execute
/// * `max_retries` - Retries after the first attempt (0 disables retrying)
/// * `command` - Label for logs and metrics (e.g. `reporting`)
/// * `metrics` - Optional metrics collector
///
/// # Errors
///
/// - `ClientError::MaxRetriesExceeded` wrapping the last transient error.
/// - `ClientError::ApiError` for non-retryable HTTP statuses (401/403 included).
/// - `ClientError::HttpError` for non-retryable transport errors.
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    max_retries: usize,
    command: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    let mut last_error: Option<ClientError> = None;

    for attempt in 0..=max_retries {
        let attempt_builder = match builder.try_clone() {
            Some(cloned) => cloned,
            None if attempt == 0 => {
                debug!(command, "Request builder cannot be cloned, single attempt only");
                return builder.send().await.map_err(ClientError::from);
            }
            None => break,
        };

        if let Some(m) = metrics {
            m.record_request(command);
        }
        let started = Instant::now();

        let error = match attempt_builder.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                if let Some(m) = metrics {
                    m.record_request_duration(command, started.elapsed(), Some(status));
                }

                if response.status().is_success() {
                    if attempt > 0 {
                        debug!(command, attempt = attempt + 1, "Request succeeded after retry");
                    }
                    return Ok(response);
                }

                if ClientError::is_retryable_status(status) {
                    ClientError::RetryableStatus {
                        status,
                        retry_after: parse_retry_after(&response),
                    }
                } else {
                    let url = response.url().to_string();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Could not read error response body".to_string());
                    let err = ClientError::ApiError {
                        status,
                        url,
                        message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                    };
                    if let Some(m) = metrics {
                        m.record_client_error(command, &err);
                    }
                    return Err(err);
                }
            }
            Err(e) => {
                if let Some(m) = metrics {
                    m.record_request_duration(command, started.elapsed(), None);
                }
                let err = ClientError::from(e);
                if !err.is_retryable() {
                    if let Some(m) = metrics {
                        m.record_client_error(command, &err);
                    }
                    return Err(err);
                }
                err
            }
        };

        if let Some(m) = metrics {
            m.record_client_error(command, &error);
        }

        if attempt < max_retries {
            let retry_after = match &error {
                ClientError::RetryableStatus { retry_after, .. } => *retry_after,
                _ => None,
            };
            let backoff = backoff_for(attempt, retry_after);
            debug!(
                command,
                attempt = attempt + 1,
                max_retries = max_retries + 1,
                backoff_secs = backoff.as_secs(),
                error = %error,
                "Transient failure, retrying with exponential backoff"
            );
            if let Some(m) = metrics {
                m.record_retry(command, attempt + 1);
            }
            tokio::time::sleep(backoff).await;
        }
        last_error = Some(error);
    }

    debug!(command, attempts = max_retries + 1, "Max retries exhausted");
    let last = last_error.unwrap_or_else(|| {
        ClientError::InvalidRequest("request body cannot be retried".to_string())
    });
    Err(ClientError::MaxRetriesExceeded(max_retries + 1, Box::new(last)))
}
