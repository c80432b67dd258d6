//! One fetch-normalize-emit-checkpoint cycle per input type.
//!
//! Responsibilities:
//! - Run a tick: resolve credentials, load the cursor, fetch, normalize,
//!   emit, flush, then advance the checkpoint.
//! - Keep at most one tick in flight per input type.
//! - Record tick metrics and a summary log line.
//!
//! Invariants:
//! - The checkpoint advances only after every event of the batch was flushed.
//! - An event cursor moves to the latest emitted timestamp, never backward.
//!   Skipped records do not influence it.
//! - Any error leaves the checkpoint untouched.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use lastpass_client::{CursorPosition, FetchBatch, FetchCursor, LastPassClient, MetricsCollector};
use lastpass_config::{Config, CredentialResolver, InputType};
use tracing::{Instrument, info, info_span, warn};

use crate::cancellation::CancellationToken;
use crate::checkpoint::CheckpointTracker;
use crate::error::ConnectorError;
use crate::normalize::{CanonicalEvent, Normalizer};
use crate::sink::{self, EventSink};

/// Outcome of a successful tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub input: InputType,
    /// Payload entries received, malformed ones included.
    pub fetched: usize,
    pub emitted: usize,
    pub skipped: usize,
    pub pages: usize,
    /// Cursor persisted by this tick.
    pub cursor: FetchCursor,
    /// Whether the cursor position moved.
    pub advanced: bool,
}

/// Wires the client, checkpoints and sink together.
pub struct Connector {
    client: Arc<LastPassClient>,
    resolver: CredentialResolver,
    tracker: CheckpointTracker,
    sink: tokio::sync::Mutex<Box<dyn EventSink>>,
    normalizer: Normalizer,
    in_flight: Mutex<HashSet<InputType>>,
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("client", &self.client)
            .field("resolver", &self.resolver)
            .field("tracker", &self.tracker)
            .field("normalizer", &self.normalizer)
            .finish_non_exhaustive()
    }
}

/// Marks an input type busy until dropped.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<InputType>>,
    input: InputType,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.input);
    }
}

impl Connector {
    pub fn new(
        client: Arc<LastPassClient>,
        resolver: CredentialResolver,
        tracker: CheckpointTracker,
        sink: Box<dyn EventSink>,
    ) -> Self {
        Self {
            normalizer: Normalizer::default(),
            client,
            resolver,
            tracker,
            sink: tokio::sync::Mutex::new(sink),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Build a connector from loaded configuration.
    ///
    /// The sink is the one selected by `config.output`; checkpoints live
    /// under `config.checkpoint_dir`.
    ///
    /// # Errors
    /// Client construction or sink configuration failures.
    pub fn from_config(
        config: &Config,
        metrics: Option<MetricsCollector>,
    ) -> Result<Self, ConnectorError> {
        let mut builder = LastPassClient::builder().from_config(config);
        if let Some(metrics) = metrics {
            builder = builder.metrics(metrics);
        }
        let client = Arc::new(builder.build()?);
        let sink = sink::from_config(&config.output, Arc::clone(&client))?;

        Ok(Self::new(
            client,
            CredentialResolver::from_config(&config.credentials),
            CheckpointTracker::file(&config.checkpoint_dir),
            sink,
        )
        .with_normalizer(Normalizer::new(config.api.utc_offset())))
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn client(&self) -> &LastPassClient {
        &self.client
    }

    pub fn tracker(&self) -> &CheckpointTracker {
        &self.tracker
    }

    /// Finish the sink's output. Call once, after the last tick.
    pub async fn close(&self) -> Result<(), ConnectorError> {
        self.sink.lock().await.close().await?;
        Ok(())
    }

    fn metrics(&self) -> Option<&MetricsCollector> {
        self.client.metrics()
    }

    fn claim(&self, input: InputType) -> Result<InFlightGuard<'_>, ConnectorError> {
        let mut set = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !set.insert(input) {
            return Err(ConnectorError::TickInProgress(input));
        }
        Ok(InFlightGuard {
            set: &self.in_flight,
            input,
        })
    }

    /// Run one tick for `input` at the current time.
    pub async fn run_tick(
        &self,
        input: InputType,
        cancel: &CancellationToken,
    ) -> Result<TickReport, ConnectorError> {
        self.run_tick_at(input, Utc::now(), cancel).await
    }

    /// Run one tick for `input` as if the current time were `now`.
    ///
    /// # Errors
    /// See [`ConnectorError`]; every error leaves the checkpoint untouched.
    pub async fn run_tick_at(
        &self,
        input: InputType,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<TickReport, ConnectorError> {
        let started = Instant::now();
        let span = info_span!(
            "connector.tick",
            input = input.as_str(),
            duration_ms = tracing::field::Empty,
        );

        async move {
            let result = self.tick(input, now, cancel).await;
            tracing::Span::current().record("duration_ms", started.elapsed().as_millis() as i64);

            match &result {
                Ok(report) => {
                    info!(
                        fetched = report.fetched,
                        emitted = report.emitted,
                        skipped = report.skipped,
                        pages = report.pages,
                        advanced = report.advanced,
                        "Tick complete"
                    );
                    if let Some(metrics) = self.metrics() {
                        metrics.record_events_emitted(input.as_str(), report.emitted);
                        metrics.record_records_skipped(input.as_str(), report.skipped);
                        metrics.record_tick(input.as_str(), "success");
                    }
                }
                Err(e) => {
                    warn!(error = %e, outcome = e.label(), "Tick failed");
                    if let Some(metrics) = self.metrics() {
                        metrics.record_tick(input.as_str(), e.label());
                    }
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn tick(
        &self,
        input: InputType,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<TickReport, ConnectorError> {
        let _guard = self.claim(input)?;
        if cancel.is_cancelled() {
            return Err(ConnectorError::Cancelled);
        }

        let credential = self.resolver.resolve()?;
        let stored = self.tracker.load(input)?;

        let cancel_check = || cancel.is_cancelled();
        let batch = self
            .client
            .fetch(input, &stored, &credential, now, &cancel_check)
            .await
            .map_err(|e| ConnectorError::from(e).for_input(input))?;

        let fetched = batch.total_entries();
        let events = self.normalize_batch(input, &batch, now)?;
        let skipped = fetched - events.len();

        {
            let mut sink = self.sink.lock().await;
            for event in &events {
                sink.emit(event).await?;
            }
            sink.flush().await?;
        }

        if cancel.is_cancelled() {
            return Err(ConnectorError::Cancelled);
        }

        let cursor = next_cursor(input, &stored, batch.next_cursor, &events);
        let advanced = cursor.last_seen != stored.last_seen;
        self.tracker.advance(input, &cursor)?;

        Ok(TickReport {
            input,
            fetched,
            emitted: events.len(),
            skipped,
            pages: batch.pages,
            cursor,
            advanced,
        })
    }

    /// Normalize every record, skipping the ones that fail, oldest first.
    fn normalize_batch(
        &self,
        input: InputType,
        batch: &FetchBatch,
        collected_at: DateTime<Utc>,
    ) -> Result<Vec<CanonicalEvent>, ConnectorError> {
        for malformed in &batch.malformed {
            warn!(
                record_id = %malformed.record_id,
                reason = %malformed.reason,
                "Skipping malformed record"
            );
        }

        let mut events = Vec::with_capacity(batch.records.len());
        for result in self.normalizer.normalize_all(&batch.records, collected_at) {
            match result {
                Ok(event) => events.push(event),
                Err(e) => warn!(error = %e, "Skipping record"),
            }
        }

        let total = batch.total_entries();
        if total > 0 && events.is_empty() {
            return Err(ConnectorError::BatchMalformed {
                input,
                count: total,
            });
        }

        events.sort_by_key(|e| e.timestamp);
        Ok(events)
    }
}

/// Position to persist after a successful emission.
///
/// Snapshot inputs take the fetch time. Events take the later of the stored
/// position and the newest emitted event.
fn next_cursor(
    input: InputType,
    stored: &FetchCursor,
    fetched: FetchCursor,
    emitted: &[CanonicalEvent],
) -> FetchCursor {
    if input.is_snapshot() {
        return fetched;
    }

    let latest = emitted.iter().map(|e| e.timestamp).max();
    let last_seen = match (stored.last_timestamp(), latest) {
        (Some(stored_ts), Some(latest)) => Some(CursorPosition::Timestamp(stored_ts.max(latest))),
        (None, Some(latest)) => Some(CursorPosition::Timestamp(latest)),
        (_, None) => stored.last_seen.clone(),
    };
    FetchCursor {
        last_seen,
        ..fetched
    }
}
