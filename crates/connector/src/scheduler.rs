//! Periodic collection loop.
//!
//! Runs one tick per enabled input type every poll interval until cancelled.
//! Inputs run one after another; a failing input is logged and does not stop
//! the others.

use std::sync::Arc;
use std::time::Duration;

use lastpass_config::InputType;
use tracing::{debug, error, info};

use crate::cancellation::CancellationToken;
use crate::error::ConnectorError;
use crate::orchestrator::{Connector, TickReport};

/// Result of one input's tick within a cycle.
pub type CycleResult = (InputType, Result<TickReport, ConnectorError>);

#[derive(Debug, Clone)]
pub struct Scheduler {
    connector: Arc<Connector>,
    inputs: Vec<InputType>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(connector: Arc<Connector>, inputs: Vec<InputType>, interval: Duration) -> Self {
        Self {
            connector,
            inputs,
            interval,
        }
    }

    pub fn inputs(&self) -> &[InputType] {
        &self.inputs
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one tick for every input, in order.
    ///
    /// Stops early once `cancel` fires; inputs not yet started are left out.
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> Vec<CycleResult> {
        let mut results = Vec::with_capacity(self.inputs.len());
        for &input in &self.inputs {
            if cancel.is_cancelled() {
                break;
            }
            let result = self.connector.run_tick(input, cancel).await;
            if let Err(e) = &result {
                error!(input = input.as_str(), error = %e, "Collection failed for input");
            }
            results.push((input, result));
        }
        results
    }

    /// Run cycles every `interval` until `cancel` fires.
    ///
    /// Returns the number of cycles started.
    pub async fn run(&self, cancel: &CancellationToken) -> usize {
        info!(
            inputs = ?self.inputs,
            interval_secs = self.interval.as_secs(),
            "Scheduler started"
        );

        let mut cycles = 0;
        loop {
            let results = self.run_cycle(cancel).await;
            cycles += 1;
            let failed = results.iter().filter(|(_, r)| r.is_err()).count();
            debug!(cycle = cycles, failed, "Cycle finished");
            if cancel.is_cancelled() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancel.cancelled() => break,
            }
        }

        info!(cycles, "Scheduler stopped");
        cycles
    }
}
