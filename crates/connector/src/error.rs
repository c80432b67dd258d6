//! Connector error taxonomy.
//!
//! Responsibilities:
//! - Classify every failure of a tick into one variant callers can act on.
//! - Convert client, config, checkpoint and sink errors into that taxonomy.
//!
//! Invariants:
//! - Any error aborts only the current tick for one input type.
//! - The checkpoint is never advanced when a tick returns an error.

use lastpass_client::ClientError;
use lastpass_config::{ConfigError, InputType};
use thiserror::Error;

use crate::checkpoint::CheckpointError;
use crate::sink::SinkError;

/// Errors that abort a tick.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Configuration or credentials are missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The vendor rejected the credentials.
    #[error("Authentication failed: {0}")]
    Auth(#[source] ClientError),

    /// Network or server trouble that persisted through every retry.
    #[error("Transient failure: {0}")]
    Transient(#[source] ClientError),

    /// The vendor response could not be understood.
    #[error("Malformed response: {0}")]
    MalformedResponse(#[source] ClientError),

    /// Every record of a non-empty batch failed to normalize.
    #[error("All {count} records fetched for {input} were malformed")]
    BatchMalformed { input: InputType, count: usize },

    /// A query window needed more pages than allowed.
    #[error("Page limit of {max_pages} exceeded for {input}")]
    PageLimitExceeded { input: InputType, max_pages: usize },

    /// The sink could not take the batch.
    #[error("Sink unavailable: {0}")]
    SinkUnavailable(#[from] SinkError),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// Another tick for the same input type is still running.
    #[error("A tick for {0} is already in progress")]
    TickInProgress(InputType),

    #[error("Tick cancelled")]
    Cancelled,

    /// Any other vendor API failure (rejected command, unexpected status).
    #[error("API error: {0}")]
    Api(#[source] ClientError),
}

impl ConnectorError {
    /// Stable label for metrics and logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Auth(_) => "auth",
            Self::Transient(_) => "transient",
            Self::MalformedResponse(_) => "malformed_response",
            Self::BatchMalformed { .. } => "batch_malformed",
            Self::PageLimitExceeded { .. } => "page_limit_exceeded",
            Self::SinkUnavailable(_) => "sink_unavailable",
            Self::Checkpoint(_) => "checkpoint",
            Self::TickInProgress(_) => "tick_in_progress",
            Self::Cancelled => "cancelled",
            Self::Api(_) => "api",
        }
    }

    /// Attach the input type to errors that carry one.
    pub(crate) fn for_input(self, input: InputType) -> Self {
        match self {
            Self::PageLimitExceeded { max_pages, .. } => Self::PageLimitExceeded { input, max_pages },
            other => other,
        }
    }
}

impl From<ClientError> for ConnectorError {
    fn from(err: ClientError) -> Self {
        if err.is_auth_error() {
            return Self::Auth(err);
        }
        match err {
            ClientError::Cancelled => Self::Cancelled,
            // The input is filled in by the orchestrator.
            ClientError::PageLimitExceeded { max_pages, .. } => Self::PageLimitExceeded {
                input: InputType::Events,
                max_pages,
            },
            ClientError::MalformedResponse { .. } => Self::MalformedResponse(err),
            ClientError::MaxRetriesExceeded(..) => Self::Transient(err),
            e if e.is_retryable() => Self::Transient(e),
            e => Self::Api(e),
        }
    }
}
