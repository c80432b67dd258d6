//! Collection pipeline for the LastPass Enterprise API.
//!
//! This crate ties the API client to durable checkpoints and event sinks:
//! - [`checkpoint`]: per-input cursor persistence with corruption recovery
//! - [`normalize`]: vendor records to [`CanonicalEvent`]
//! - [`sink`]: XML stream, NDJSON, HEC and in-memory emitters
//! - [`orchestrator`]: the `run_tick` cycle
//! - [`scheduler`]: the polling loop

pub mod cancellation;
pub mod checkpoint;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod scheduler;
pub mod sink;

pub use cancellation::CancellationToken;
pub use checkpoint::{
    CheckpointError, CheckpointState, CheckpointStore, CheckpointTracker, FileCheckpointStore,
    MemoryCheckpointStore,
};
pub use error::ConnectorError;
pub use normalize::{CanonicalEvent, EventType, NormalizeError, Normalizer, normalize};
pub use orchestrator::{Connector, TickReport};
pub use scheduler::{CycleResult, Scheduler};
pub use sink::{EventSink, HecSink, MemorySink, NdjsonSink, SinkError, SinkMetadata, StreamSink};
