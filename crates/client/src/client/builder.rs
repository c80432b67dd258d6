//! Client builder for constructing [`LastPassClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Normalizing the API URL (removing trailing slashes)
//! - Configuring the underlying HTTP client (timeout, redirects)
//!
//! # What this module does NOT handle:
//! - Actual API calls (handled by [`LastPassClient`] methods)
//! - Credential resolution (handled by `lastpass_config::CredentialResolver`)
//!
//! # Invariants
//! - `base_url` is required and must be provided before calling `build()`
//! - `max_pages` and `page_size` are at least 1

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use lastpass_config::{
    Config,
    constants::{
        DEFAULT_API_USER, DEFAULT_MAX_PAGES, DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES,
        DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS,
    },
};

use crate::auth::AuthStrategy;
use crate::client::LastPassClient;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;

/// Builder for creating a new [`LastPassClient`].
///
/// # Example
///
/// ```rust,ignore
/// use lastpass_client::LastPassClient;
///
/// let client = LastPassClient::builder()
///     .base_url("https://lastpass.com/enterpriseapi.php".to_string())
///     .timeout(Duration::from_secs(60))
///     .build()?;
/// ```
pub struct LastPassClientBuilder {
    base_url: Option<String>,
    api_user: String,
    auth_strategy: AuthStrategy,
    timeout: Duration,
    max_retries: usize,
    max_pages: usize,
    page_size: usize,
    utc_offset: FixedOffset,
    time_start: Option<DateTime<Utc>>,
    metrics: Option<MetricsCollector>,
}

impl Default for LastPassClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            api_user: DEFAULT_API_USER.to_string(),
            auth_strategy: AuthStrategy::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            max_pages: DEFAULT_MAX_PAGES,
            page_size: DEFAULT_PAGE_SIZE,
            utc_offset: Utc.fix(),
            time_start: None,
            metrics: None,
        }
    }
}

impl LastPassClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the full URL of the enterprise API endpoint.
    ///
    /// Trailing slashes will be automatically removed.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the `apiuser` envelope value.
    pub fn api_user(mut self, api_user: impl Into<String>) -> Self {
        self.api_user = api_user.into();
        self
    }

    /// Set how the provisioning hash is sent.
    pub fn auth_strategy(mut self, strategy: AuthStrategy) -> Self {
        self.auth_strategy = strategy;
        self
    }

    /// Set the request timeout.
    ///
    /// Default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries for transient failures.
    ///
    /// Default is 3 retries with exponential backoff (1s, 2s, 4s delays).
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the maximum number of pages per query window.
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the `getuserdata` page size.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the offset vendor timestamps are expressed in.
    pub fn utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Set the start time used when an events cursor is empty.
    pub fn time_start(mut self, time_start: Option<DateTime<Utc>>) -> Self {
        self.time_start = time_start;
        self
    }

    /// Set the metrics collector for API call performance tracking.
    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Create a client builder from configuration.
    pub fn from_config(mut self, config: &Config) -> Self {
        self.base_url = Some(config.api.base_url.clone());
        self.api_user = config.api.api_user.clone();
        self.auth_strategy = AuthStrategy::from(config.api.auth_scheme);
        self.timeout = config.api.timeout;
        self.max_retries = config.api.max_retries;
        self.max_pages = config.api.max_pages;
        self.page_size = config.api.page_size;
        self.utc_offset = config.api.utc_offset();
        self.time_start = config.collection.time_start;
        self
    }

    /// Normalize a base URL by removing trailing slashes.
    ///
    /// - `"https://lastpass.com/enterpriseapi.php/"` -> `"https://lastpass.com/enterpriseapi.php"`
    fn normalize_base_url(url: String) -> String {
        url.trim_end_matches('/').to_string()
    }

    /// Build the [`LastPassClient`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` was not provided.
    /// Returns [`ClientError::InvalidRequest`] if `max_pages` or `page_size` is zero.
    /// Returns `ClientError::HttpError` if the HTTP client fails to build.
    pub fn build(self) -> Result<LastPassClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;
        let base_url = Self::normalize_base_url(base_url);
        if base_url.is_empty() {
            return Err(ClientError::InvalidUrl("base_url is empty".to_string()));
        }
        if self.max_pages == 0 || self.page_size == 0 {
            return Err(ClientError::InvalidRequest(
                "max_pages and page_size must be at least 1".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS))
            .user_agent(concat!("lastpass-collector/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(LastPassClient {
            http,
            base_url,
            api_user: self.api_user,
            auth: self.auth_strategy,
            max_retries: self.max_retries,
            max_pages: self.max_pages,
            page_size: self.page_size,
            utc_offset: self.utc_offset,
            time_start: self.time_start,
            metrics: self.metrics,
        })
    }
}
