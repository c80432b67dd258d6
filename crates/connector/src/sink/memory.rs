//! In-memory sink for tests and dry runs.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{EventSink, SinkError};
use crate::normalize::CanonicalEvent;

/// Collects events in a shared vector.
///
/// Clones share storage, so a test can keep a handle while the connector owns
/// the sink. Events become visible on `flush`.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pending: Vec<CanonicalEvent>,
    flushed: Arc<Mutex<Vec<CanonicalEvent>>>,
    flushes: Arc<Mutex<usize>>,
    fail_after: Option<usize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `emit` fail with `SinkError::Unavailable` once `count` events were accepted.
    pub fn failing_after(count: usize) -> Self {
        Self {
            fail_after: Some(count),
            ..Self::default()
        }
    }

    /// Events handed off by successful flushes.
    pub fn events(&self) -> Vec<CanonicalEvent> {
        lock(&self.flushed).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.flushed).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successful flushes.
    pub fn flush_count(&self) -> usize {
        *lock(&self.flushes)
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn emit(&mut self, event: &CanonicalEvent) -> Result<(), SinkError> {
        if let Some(limit) = self.fail_after
            && self.len() + self.pending.len() >= limit
        {
            self.pending.clear();
            return Err(SinkError::Unavailable("memory sink is full".to_string()));
        }
        self.pending.push(event.clone());
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        lock(&self.flushed).append(&mut self.pending);
        *lock(&self.flushes) += 1;
        Ok(())
    }
}
