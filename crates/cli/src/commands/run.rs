//! Run command: poll every enabled input until interrupted.

use std::sync::Arc;

use anyhow::{Context, Result};
use lastpass_client::MetricsCollector;
use lastpass_config::{Config, CredentialResolver};
use lastpass_connector::{CancellationToken, Connector, Scheduler};
use tracing::info;

pub async fn run(
    config: Config,
    metrics: Option<MetricsCollector>,
    cancel: &CancellationToken,
) -> Result<()> {
    // Ticks resolve credentials again; this only fails fast on a bad setup.
    CredentialResolver::from_config(&config.credentials).resolve()?;

    let connector = Arc::new(Connector::from_config(&config, metrics)?);
    let scheduler = Scheduler::new(
        Arc::clone(&connector),
        config.collection.inputs.clone(),
        config.collection.poll_interval,
    );

    info!(
        inputs = ?scheduler.inputs(),
        interval_secs = scheduler.interval().as_secs(),
        sink = %config.output.sink,
        "Starting collection"
    );
    let cycles = scheduler.run(cancel).await;

    connector
        .close()
        .await
        .context("Failed to close event sink")?;
    info!(cycles, "Collection stopped");
    Ok(())
}
