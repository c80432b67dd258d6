//! Metrics collection for API calls and collection ticks.
//!
//! This module provides metrics for the collector, including:
//! - Request latency histograms
//! - Request counters (total, retries, errors)
//! - Emitted/skipped record counters and tick outcomes
//!
//! # What this module does NOT handle:
//! - Metrics exposition/export (see [`crate::metrics_exporter`])
//!
//! # Invariants
//! - All metrics use consistent label names: `command`, `status`, `error_category`, `input`, `outcome`
//! - Metric recording is infallible
//! - Zero-cost when no metrics recorder is installed

use crate::error::ClientError;
use std::time::Duration;

/// Metric name for request duration histogram.
pub const METRIC_REQUEST_DURATION: &str = "lastpass_api_request_duration_seconds";

/// Metric name for total request counter.
pub const METRIC_REQUESTS_TOTAL: &str = "lastpass_api_requests_total";

/// Metric name for retry counter.
pub const METRIC_RETRIES_TOTAL: &str = "lastpass_api_retries_total";

/// Metric name for error counter.
pub const METRIC_ERRORS_TOTAL: &str = "lastpass_api_errors_total";

/// Metric name for emitted event counter.
pub const METRIC_EVENTS_EMITTED: &str = "lastpass_events_emitted_total";

/// Metric name for skipped record counter.
pub const METRIC_RECORDS_SKIPPED: &str = "lastpass_records_skipped_total";

/// Metric name for tick counter.
pub const METRIC_TICKS_TOTAL: &str = "lastpass_ticks_total";

/// Error categories for metrics labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection, DNS, timeout and other transport failures
    Transport,
    /// Rejected credentials
    Auth,
    /// HTTP 4xx client errors other than auth
    Http4xx,
    /// HTTP 5xx server errors
    Http5xx,
    /// Rate limited (429)
    RateLimited,
    /// Non-OK envelope status or malformed body
    Api,
    /// Unknown/unclassified errors
    Unknown,
}

impl ErrorCategory {
    /// Returns the string label for this error category.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transport => "transport",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Http4xx => "http_4xx",
            ErrorCategory::Http5xx => "http_5xx",
            ErrorCategory::RateLimited => "rate_limited",
            ErrorCategory::Api => "api",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl From<&ClientError> for ErrorCategory {
    fn from(error: &ClientError) -> Self {
        if error.is_auth_error() {
            return ErrorCategory::Auth;
        }
        match error {
            ClientError::HttpError(_) => ErrorCategory::Transport,
            ClientError::RetryableStatus { status: 429, .. } => ErrorCategory::RateLimited,
            ClientError::RetryableStatus { .. } => ErrorCategory::Http5xx,
            ClientError::ApiError { status, .. } if (400..500).contains(status) => {
                ErrorCategory::Http4xx
            }
            ClientError::ApiError { status, .. } if (500..600).contains(status) => {
                ErrorCategory::Http5xx
            }
            ClientError::Rejected { .. }
            | ClientError::MalformedResponse { .. }
            | ClientError::PageLimitExceeded { .. } => ErrorCategory::Api,
            ClientError::MaxRetriesExceeded(_, inner) => ErrorCategory::from(inner.as_ref()),
            _ => ErrorCategory::Unknown,
        }
    }
}

/// Metrics collector for the collector's API calls and ticks.
///
/// A thin wrapper around the `metrics` crate macros with consistent labels.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    /// Create an enabled collector.
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a collector that records nothing.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record the duration of an API request.
    ///
    /// `status` is `None` when no response was received.
    pub fn record_request_duration(&self, command: &str, duration: Duration, status: Option<u16>) {
        if !self.enabled {
            return;
        }

        let status_label = status.map_or("error".to_string(), |s| s.to_string());

        metrics::histogram!(METRIC_REQUEST_DURATION,
            "command" => command.to_string(),
            "status" => status_label,
        )
        .record(duration.as_secs_f64());
    }

    /// Record a request attempt, retries included.
    pub fn record_request(&self, command: &str) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_REQUESTS_TOTAL,
            "command" => command.to_string(),
        )
        .increment(1);
    }

    /// Record a retry attempt (1-based).
    pub fn record_retry(&self, command: &str, attempt: usize) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_RETRIES_TOTAL,
            "command" => command.to_string(),
            "attempt" => attempt.to_string(),
        )
        .increment(1);
    }

    /// Record an error, categorized from the `ClientError`.
    pub fn record_client_error(&self, command: &str, error: &ClientError) {
        if !self.enabled {
            return;
        }

        let category = ErrorCategory::from(error);
        metrics::counter!(METRIC_ERRORS_TOTAL,
            "command" => command.to_string(),
            "error_category" => category.as_str(),
        )
        .increment(1);
    }

    /// Record events handed to the sink for an input.
    pub fn record_events_emitted(&self, input: &'static str, count: usize) {
        if !self.enabled || count == 0 {
            return;
        }
        metrics::counter!(METRIC_EVENTS_EMITTED, "input" => input).increment(count as u64);
    }

    /// Record records dropped during parsing or normalization.
    pub fn record_records_skipped(&self, input: &'static str, count: usize) {
        if !self.enabled || count == 0 {
            return;
        }
        metrics::counter!(METRIC_RECORDS_SKIPPED, "input" => input).increment(count as u64);
    }

    /// Record a finished tick. `outcome` is `success` or an error label.
    pub fn record_tick(&self, input: &'static str, outcome: &'static str) {
        if !self.enabled {
            return;
        }
        metrics::counter!(METRIC_TICKS_TOTAL,
            "input" => input,
            "outcome" => outcome,
        )
        .increment(1);
    }
}
