//! Error types for the LastPass client.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during LastPass client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Credentials were rejected by the vendor.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-success HTTP status that is not retried.
    #[error("API error ({status}) at {url}: {message}")]
    ApiError {
        status: u16,
        url: String,
        message: String,
    },

    /// HTTP status that is retried (429, 5xx).
    #[error("Retryable HTTP status {status}{}", .retry_after.map(|d| format!(" (retry after {}s)", d.as_secs())).unwrap_or_default())]
    RetryableStatus {
        status: u16,
        retry_after: Option<Duration>,
    },

    /// The API answered with a non-OK status for the command.
    #[error("LastPass rejected '{command}': {message}")]
    Rejected {
        command: &'static str,
        message: String,
    },

    /// The response body could not be understood.
    #[error("Malformed response for '{command}': {message}")]
    MalformedResponse {
        command: &'static str,
        message: String,
    },

    /// Too many pages were returned for one query window.
    #[error("Page limit of {max_pages} exceeded for '{command}'")]
    PageLimitExceeded {
        command: &'static str,
        max_pages: usize,
    },

    /// Maximum retries exceeded; holds the last error seen.
    #[error("Maximum retries exceeded ({0} attempts): {1}")]
    MaxRetriesExceeded(usize, Box<ClientError>),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Fetch was cancelled between pages or windows.
    #[error("Fetch cancelled")]
    Cancelled,
}

impl ClientError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(e) => !e.is_builder() && !e.is_decode(),
            Self::RetryableStatus { .. } => true,
            _ => false,
        }
    }

    /// Check if an HTTP status code is retryable.
    ///
    /// Retryable status codes:
    /// - 429: Too Many Requests (rate limiting)
    /// - 500-599: server errors
    ///
    /// Everything else fails immediately.
    pub fn is_retryable_status(status: u16) -> bool {
        status == 429 || (500..=599).contains(&status)
    }

    /// Check if this error indicates authentication failure.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::AuthFailed(_) => true,
            Self::ApiError { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }

    /// The error that ended a retry loop, or `self`.
    pub fn root(&self) -> &ClientError {
        match self {
            Self::MaxRetriesExceeded(_, inner) => inner.root(),
            other => other,
        }
    }
}
