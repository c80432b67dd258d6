//! Collect command: one tick per input, then exit.

use anyhow::{Context, Result};
use lastpass_client::MetricsCollector;
use lastpass_config::{Config, InputType};
use lastpass_connector::{CancellationToken, Connector, ConnectorError};
use tracing::info;

use super::select_inputs;

/// Run one tick for each of `inputs` (or the configured inputs).
///
/// A failing input does not stop the others; the first failure decides the
/// command's result.
pub async fn run(
    config: Config,
    inputs: Vec<InputType>,
    metrics: Option<MetricsCollector>,
    cancel: &CancellationToken,
) -> Result<()> {
    let inputs = select_inputs(&inputs, &config.collection.inputs);
    let connector = Connector::from_config(&config, metrics)?;

    let mut first_error: Option<(InputType, ConnectorError)> = None;
    let mut emitted = 0;
    for input in inputs {
        let result = if cancel.is_cancelled() {
            Err(ConnectorError::Cancelled)
        } else {
            connector.run_tick(input, cancel).await
        };
        match result {
            Ok(report) => emitted += report.emitted,
            Err(e) if first_error.is_none() => first_error = Some((input, e)),
            Err(_) => {}
        }
        if cancel.is_cancelled() {
            break;
        }
    }

    connector
        .close()
        .await
        .context("Failed to close event sink")?;
    info!(emitted, "Collection finished");

    match first_error {
        Some((input, e)) => {
            Err(anyhow::Error::new(e).context(format!("Collection failed for {input}")))
        }
        None => Ok(()),
    }
}
