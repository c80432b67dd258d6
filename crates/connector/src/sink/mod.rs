//! Emitter: delivery of canonical events to the indexing side.
//!
//! Responsibilities:
//! - Define the [`EventSink`] seam the orchestrator emits through.
//! - Stamp events with index/source/sourcetype/host metadata.
//! - Build the configured sink from [`OutputConfig`].
//!
//! Does NOT handle:
//! - Retrying delivery. `SinkError::Unavailable` fails the tick and the
//!   unchanged checkpoint makes the next tick re-emit.

mod hec;
mod memory;
mod ndjson;
mod stream;

pub use hec::HecSink;
pub use memory::MemorySink;
pub use ndjson::NdjsonSink;
pub use stream::StreamSink;

use std::sync::Arc;

use async_trait::async_trait;
use lastpass_client::{HecEvent, LastPassClient};
use lastpass_config::{ConfigError, InputType, OutputConfig, SinkKind};
use thiserror::Error;

use crate::normalize::CanonicalEvent;

/// Errors raised while emitting.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The destination refused or could not be reached.
    #[error("{0}")]
    Unavailable(String),

    #[error("Sink write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Destination for canonical events.
///
/// `emit` may buffer; only a successful `flush` means every emitted event was
/// handed off.
#[async_trait]
pub trait EventSink: Send {
    async fn emit(&mut self, event: &CanonicalEvent) -> Result<(), SinkError>;

    async fn flush(&mut self) -> Result<(), SinkError>;

    /// Finish the output at shutdown.
    async fn close(&mut self) -> Result<(), SinkError> {
        self.flush().await
    }
}

/// Splunk sourcetype for an input type.
pub const fn sourcetype(input: InputType) -> &'static str {
    match input {
        InputType::Events => "lastpass:activity",
        InputType::Users => "lastpass:users",
        InputType::Groups => "lastpass:groups",
        InputType::SharedFolders => "lastpass:sharedfolders",
    }
}

/// Splunk source for an input type.
pub fn source(input: InputType) -> String {
    format!("lastpass://{}", input.as_str())
}

/// Index and host stamped on every emitted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkMetadata {
    pub index: String,
    pub host: Option<String>,
}

impl SinkMetadata {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            host: None,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn from_config(output: &OutputConfig) -> Self {
        Self {
            index: output.index.clone(),
            host: output.host.clone(),
        }
    }

    /// Wrap an event in an HEC envelope.
    pub fn hec_event(&self, event: &CanonicalEvent) -> Result<HecEvent, SinkError> {
        let mut hec = HecEvent::new(serde_json::to_value(event)?)
            .with_index(&self.index)
            .with_source(source(event.input_type))
            .with_sourcetype(sourcetype(event.input_type))
            .with_time(epoch_seconds(event));
        if let Some(host) = &self.host {
            hec = hec.with_host(host);
        }
        Ok(hec)
    }
}

fn epoch_seconds(event: &CanonicalEvent) -> f64 {
    event.timestamp.timestamp() as f64 + f64::from(event.timestamp.timestamp_subsec_millis()) / 1000.0
}

/// Build the sink selected by `output`, writing stream and NDJSON output to stdout.
///
/// # Errors
/// `ConfigError::MissingHecSettings` when the HEC sink is selected without
/// a URL and token.
pub fn from_config(
    output: &OutputConfig,
    client: Arc<LastPassClient>,
) -> Result<Box<dyn EventSink>, ConfigError> {
    let metadata = SinkMetadata::from_config(output);
    Ok(match output.sink {
        SinkKind::Stream => Box::new(StreamSink::new(std::io::stdout(), metadata)),
        SinkKind::Ndjson => Box::new(NdjsonSink::new(std::io::stdout(), metadata)),
        SinkKind::Hec => {
            let hec = output.hec.as_ref().ok_or(ConfigError::MissingHecSettings)?;
            Box::new(HecSink::new(
                client,
                hec.url.clone(),
                hec.token.clone(),
                metadata,
            ))
        }
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{TimeZone, Utc};
    use serde_json::{Map, json};
    use uuid::Uuid;

    use crate::normalize::{CanonicalEvent, EventType};
    use lastpass_config::InputType;

    pub fn event(action: &str) -> CanonicalEvent {
        let mut raw = Map::new();
        raw.insert("Action".to_string(), json!(action));
        CanonicalEvent {
            id: Uuid::nil(),
            input_type: InputType::Events,
            timestamp: Utc.timestamp_opt(1_709_287_200, 250_000_000).unwrap(),
            event_type: EventType::Activity,
            actor_user: Some("alice@example.com".to_string()),
            target_resource: None,
            action: Some(action.to_string()),
            source_ip: None,
            raw_fields: raw,
            collected_at: Utc.timestamp_opt(1_709_290_800, 0).unwrap(),
        }
    }
}
