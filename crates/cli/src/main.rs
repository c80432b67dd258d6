//! lastpass-collector - Collect LastPass Enterprise data for Splunk.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Initialize logging, tracing and the optional Prometheus exporter.
//! - Load configuration (file, then environment, then command line).
//! - Run the selected command and map its outcome to an exit code.
//!
//! Does NOT handle:
//! - API access or collection logic (see `crates/client` and `crates/connector`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` can provide clap defaults.
//! - Logs go to stderr; stdout carries only command output and sink events.

mod args;
mod cancellation;
mod commands;
mod dispatch;
mod error;

use args::Cli;
use cancellation::{install_signal_handler, is_cancelled_error, print_cancelled_message};
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use lastpass_client::MetricsCollector;
use lastpass_client::metrics_exporter::MetricsExporter;
use lastpass_client::tracing::TracingConfig;
use lastpass_config::{Config, ConfigError, ConfigLoader};
use lastpass_connector::CancellationToken;

fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.explicit_config_path() {
        loader = loader.with_config_path(path);
    }
    let loader = loader.from_file()?.from_env()?;
    cli.apply_overrides(loader).build()
}

#[tokio::main]
async fn main() {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    let mut tracing_config = TracingConfig::new().with_json_logs(cli.log_json);
    if let Some(ref endpoint) = cli.otlp_endpoint {
        tracing_config = tracing_config.with_otlp_endpoint(endpoint);
    }
    if cli.verbose {
        tracing_config = tracing_config.with_default_filter("debug");
    }
    let tracing_guard = match tracing_config.init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    // Initialize metrics exporter if --metrics-bind is provided
    let metrics_exporter = match cli.metrics_bind.as_deref() {
        Some(bind_addr) => match MetricsExporter::install(bind_addr) {
            Ok(exporter) => Some(exporter),
            Err(e) => {
                eprintln!("Failed to start metrics exporter: {}", e);
                std::process::exit(ExitCode::GeneralError.as_i32());
            }
        },
        None => None,
    };
    let metrics = metrics_exporter.as_ref().map(|_| MetricsCollector::new());

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            tracing_guard.shutdown();
            std::process::exit(ExitCode::from(&e).as_i32());
        }
    };

    let cancel = CancellationToken::new();
    install_signal_handler(cancel.clone());

    let exit_code = match run_command(cli.command, config, metrics, &cancel).await {
        Ok(()) => ExitCode::Success,
        Err(e) if is_cancelled_error(&e) => {
            print_cancelled_message();
            ExitCode::Interrupted
        }
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    // Shutdown tracing to ensure all spans are flushed
    tracing_guard.shutdown();

    std::process::exit(exit_code.as_i32());
}
