//! Shared request path for LastPass Enterprise API commands.
//!
//! # What this module handles:
//! - Building the `{cid, provhash, cmd, apiuser, data}` envelope
//! - Sending it through the retry helper
//! - Detecting auth failures reported in the body
//! - Parsing and status-checking the response envelope
//!
//! # What this module does NOT handle:
//! - Extracting records from command payloads (see [`super::parsing`])
//! - Pagination (see [`crate::client::pagination`])

use lastpass_config::Credential;
use reqwest::Client;
use serde_json::Value;

use crate::auth::AuthStrategy;
use crate::endpoints::send_request_with_retry;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{ApiResponse, Command, RequestEnvelope};
use crate::tracing::inject_trace_context;

/// Marker the API puts in the body when `cid`/`provhash` are rejected.
const AUTH_ERROR_MARKER: &str = "Authorization Error";

/// Everything needed to issue one enterprise API call.
#[derive(Clone, Copy)]
pub struct ApiContext<'a> {
    pub http: &'a Client,
    pub url: &'a str,
    pub api_user: &'a str,
    pub auth: AuthStrategy,
    pub credential: &'a Credential,
    pub max_retries: usize,
    pub metrics: Option<&'a MetricsCollector>,
}

/// Post one command and return its status-checked response.
///
/// # Errors
///
/// - `ClientError::AuthFailed` when a non-JSON body or the envelope error reports
///   an authorization error.
/// - `ClientError::MalformedResponse` when the body is not a JSON object.
/// - `ClientError::Rejected` when the envelope status is not OK.
/// - Any error from [`send_request_with_retry`].
pub async fn post_command(ctx: ApiContext<'_>, command: Command, data: Value) -> Result<ApiResponse> {
    let envelope = RequestEnvelope {
        cid: ctx.credential.customer_id(),
        provhash: ctx.auth.envelope_hash(ctx.credential),
        cmd: command.as_str(),
        apiuser: ctx.api_user,
        data,
    };

    let builder = ctx.http.post(ctx.url).json(&envelope);
    let builder = inject_trace_context(ctx.auth.apply(builder, ctx.credential));

    let response =
        send_request_with_retry(builder, ctx.max_retries, command.as_str(), ctx.metrics).await?;

    let body = response.text().await?;
    let result = parse_body(command, &body);
    if let (Err(e), Some(m)) = (&result, ctx.metrics) {
        m.record_client_error(command.as_str(), e);
    }
    result
}

fn parse_body(command: Command, body: &str) -> Result<ApiResponse> {
    let parsed = serde_json::from_str::<Value>(body)
        .map_err(|e| ClientError::MalformedResponse {
            command: command.as_str(),
            message: format!("invalid JSON at line {}, column {}", e.line(), e.column()),
        })
        .and_then(|value| ApiResponse::from_value(command, value));

    let response = match parsed {
        Ok(response) => response,
        Err(_) if body.contains(AUTH_ERROR_MARKER) => return Err(auth_failed(command)),
        Err(e) => return Err(e),
    };

    // Record payloads may quote the marker; only the envelope error counts.
    if let Err(e) = response.ensure_ok(command) {
        if response
            .error
            .as_deref()
            .is_some_and(|error| error.contains(AUTH_ERROR_MARKER))
        {
            return Err(auth_failed(command));
        }
        return Err(e);
    }
    Ok(response)
}

fn auth_failed(command: Command) -> ClientError {
    ClientError::AuthFailed(format!(
        "{AUTH_ERROR_MARKER} for '{}'; verify the customer ID and provisioning hash",
        command.as_str()
    ))
}
