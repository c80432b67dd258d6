//! Main LastPass Enterprise API client.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - [`windows`]: Reporting time-window planning
//! - [`pagination`]: Pull-based page iteration
//! - `fetch`: The per-input `fetch` operation
//! - `hec`: HEC submission through the client's HTTP stack
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//! - Credential resolution and checkpoint storage
//!
//! # Invariants
//! - The client holds no credentials; every call takes the tick's `Credential`

pub mod builder;
mod fetch;
mod hec;
pub mod pagination;
pub mod windows;

use chrono::{DateTime, FixedOffset, Utc};
use lastpass_config::Credential;

use crate::auth::AuthStrategy;
use crate::endpoints::ApiContext;
use crate::metrics::MetricsCollector;

/// LastPass Enterprise API client.
///
/// Use [`LastPassClient::builder()`] to create a new client:
///
/// ```rust,ignore
/// use lastpass_client::LastPassClient;
///
/// let client = LastPassClient::builder().from_config(&config).build()?;
/// let batch = client.fetch(InputType::Events, &cursor, &credential, Utc::now(), &|| false).await?;
/// ```
#[derive(Debug)]
pub struct LastPassClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) api_user: String,
    pub(crate) auth: AuthStrategy,
    pub(crate) max_retries: usize,
    pub(crate) max_pages: usize,
    pub(crate) page_size: usize,
    pub(crate) utc_offset: FixedOffset,
    pub(crate) time_start: Option<DateTime<Utc>>,
    pub(crate) metrics: Option<MetricsCollector>,
}

impl LastPassClient {
    /// Create a new client builder.
    pub fn builder() -> builder::LastPassClientBuilder {
        builder::LastPassClientBuilder::new()
    }

    /// Get the API URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_strategy(&self) -> AuthStrategy {
        self.auth
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    pub fn metrics(&self) -> Option<&MetricsCollector> {
        self.metrics.as_ref()
    }

    pub(crate) fn context<'a>(&'a self, credential: &'a Credential) -> ApiContext<'a> {
        ApiContext {
            http: &self.http,
            url: &self.base_url,
            api_user: &self.api_user,
            auth: self.auth,
            credential,
            max_retries: self.max_retries,
            metrics: self.metrics.as_ref(),
        }
    }
}
