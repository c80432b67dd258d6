//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Carry per-invocation overrides of the loaded configuration.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not read config files or `LASTPASS_*` variables (see `lastpass_config::ConfigLoader`).

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use lastpass_config::{ConfigLoader, InputType, SinkKind};

#[derive(Parser)]
#[command(name = "lastpass-collector")]
#[command(about = "Collect LastPass Enterprise activity and directory data", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  lastpass-collector validate\n  lastpass-collector collect --input events\n  lastpass-collector --sink hec run\n  lastpass-collector checkpoint show events\n  lastpass-collector checkpoint reset --all\n"
)]
pub struct Cli {
    /// Path to a JSON configuration file (overrides default location).
    ///
    /// Can also be set via LASTPASS_CONFIG_PATH environment variable.
    #[arg(long, global = true, env = "LASTPASS_CONFIG_PATH", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Enterprise API URL (e.g., https://lastpass.com/enterpriseapi.php)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Maximum number of retries for failed requests
    #[arg(long, global = true)]
    pub max_retries: Option<usize>,

    /// Comma-separated input types (events, users, groups, shared_folders)
    #[arg(long, global = true, value_delimiter = ',')]
    pub inputs: Option<Vec<InputType>>,

    /// Seconds between collection cycles in `run`
    #[arg(long, global = true)]
    pub poll_interval: Option<u64>,

    /// Where events are written (stream, ndjson, hec)
    #[arg(long, global = true)]
    pub sink: Option<SinkKind>,

    /// Directory holding checkpoint files
    #[arg(long, global = true, value_name = "DIR")]
    pub checkpoint_dir: Option<PathBuf>,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// OTLP endpoint for exporting traces (e.g., http://localhost:4317)
    #[arg(long, global = true, env = "LASTPASS_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Serve Prometheus metrics on this address (e.g., 127.0.0.1:9090)
    #[arg(long, global = true, env = "LASTPASS_METRICS_BIND", value_name = "ADDR")]
    pub metrics_bind: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll every enabled input until interrupted
    Run,

    /// Run a single tick for each input and exit
    Collect {
        /// Input types to collect (defaults to the configured inputs)
        #[arg(long = "input", value_delimiter = ',')]
        inputs: Vec<InputType>,
    },

    /// Inspect or reset stored checkpoints
    Checkpoint {
        #[command(subcommand)]
        command: CheckpointCommand,
    },

    /// Check configuration and credentials without collecting
    Validate {
        /// Also check that the HEC endpoint is reachable and healthy
        #[arg(long)]
        hec: bool,
    },
}

#[derive(Subcommand)]
pub enum CheckpointCommand {
    /// Print stored checkpoints as JSON
    Show {
        /// Only this input type
        input: Option<InputType>,
    },

    /// Delete stored checkpoints so collection restarts from the lookback window
    Reset {
        /// Input type to reset
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        input: Option<InputType>,

        /// Reset every input type
        #[arg(long)]
        all: bool,
    },
}

impl Cli {
    /// Apply command-line overrides on top of file and environment settings.
    pub fn apply_overrides(&self, mut loader: ConfigLoader) -> ConfigLoader {
        if let Some(ref url) = self.api_url {
            loader = loader.with_api_url(url.clone());
        }
        if let Some(secs) = self.timeout {
            loader = loader.with_timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = self.max_retries {
            loader = loader.with_max_retries(retries);
        }
        if let Some(ref inputs) = self.inputs {
            loader = loader.with_inputs(inputs.clone());
        }
        if let Some(secs) = self.poll_interval {
            loader = loader.with_poll_interval(Duration::from_secs(secs));
        }
        if let Some(sink) = self.sink {
            loader = loader.with_sink(sink);
        }
        if let Some(ref dir) = self.checkpoint_dir {
            loader = loader.with_checkpoint_dir(dir.clone());
        }
        loader
    }

    /// Config path from the command line, ignoring blank values.
    pub fn explicit_config_path(&self) -> Option<PathBuf> {
        self.config_path
            .as_ref()
            .filter(|path| !path.to_string_lossy().trim().is_empty())
            .cloned()
    }
}
