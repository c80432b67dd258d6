//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the matching command handler.
//! - Pass the loaded configuration, metrics and cancellation token along.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `main()`).

use anyhow::Result;
use lastpass_client::MetricsCollector;
use lastpass_config::Config;
use lastpass_connector::CancellationToken;

use crate::args::Commands;
use crate::commands;

pub(crate) async fn run_command(
    command: Commands,
    config: Config,
    metrics: Option<MetricsCollector>,
    cancel: &CancellationToken,
) -> Result<()> {
    match command {
        Commands::Run => commands::run::run(config, metrics, cancel).await,
        Commands::Collect { inputs } => {
            commands::collect::run(config, inputs, metrics, cancel).await
        }
        Commands::Checkpoint { command } => commands::checkpoint::run(&config, command),
        Commands::Validate { hec } => commands::validate::run(config, hec, cancel).await,
    }
}
