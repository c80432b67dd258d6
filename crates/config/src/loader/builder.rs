//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Support loading from a JSON config file, environment variables, and direct builder methods.
//! - Validate ranges and build the final `Config`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - Config file parsing logic (delegated to file.rs).
//! - Resolving or validating credentials (see `credentials` module).
//!
//! Invariants / Assumptions:
//! - Environment variables take precedence over config file values.
//! - Builder methods take precedence over environment variables when called after `from_env()`.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.
//! - A missing default config file is not an error; a missing explicit one is.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;

use super::env::{apply_env, env_var_or_none};
use super::error::ConfigError;
use super::file::{apply_file, read_config_file};
use super::validation::{normalize_https_url, parse_time_start};
use crate::constants::{
    APP_NAME, DEFAULT_API_USER, DEFAULT_INDEX, DEFAULT_MAX_PAGES, DEFAULT_MAX_RETRIES,
    DEFAULT_PAGE_SIZE, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS, MAX_MAX_RETRIES,
    MAX_POLL_INTERVAL_SECS, MAX_TIMEOUT_SECS, MIN_POLL_INTERVAL_SECS,
};
use crate::types::{
    ApiConfig, AuthScheme, CollectionConfig, Config, CredentialConfig, HecConfig, InputType,
    OutputConfig, SecureValue, SinkKind,
};

/// Valid range for the vendor UTC offset, in minutes (UTC-12:00 to UTC+14:00).
const UTC_OFFSET_RANGE_MINUTES: std::ops::RangeInclusive<i32> = -720..=840;

/// Configuration loader that builds config from a file and environment variables.
#[derive(Default)]
pub struct ConfigLoader {
    api_url: Option<String>,
    api_user: Option<String>,
    auth_scheme: Option<AuthScheme>,
    customer_id: Option<String>,
    provisioning_hash: Option<SecureValue>,
    timeout_secs: Option<u64>,
    max_retries: Option<usize>,
    max_pages: Option<usize>,
    page_size: Option<usize>,
    utc_offset_minutes: Option<i32>,
    time_start: Option<String>,
    inputs: Option<Vec<InputType>>,
    poll_interval_secs: Option<u64>,
    index: Option<String>,
    host: Option<String>,
    sink: Option<SinkKind>,
    hec_url: Option<String>,
    hec_token: Option<SecureValue>,
    checkpoint_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the .env file will not be loaded (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Use an explicit config file path instead of the default location.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Read configuration from the JSON config file.
    ///
    /// The path comes from `with_config_path`, then `LASTPASS_CONFIG_PATH`,
    /// then the platform config directory. Only the default location may be absent.
    pub fn from_file(mut self) -> Result<Self, ConfigError> {
        let explicit = self
            .config_path
            .clone()
            .or_else(|| env_var_or_none("LASTPASS_CONFIG_PATH").map(PathBuf::from));

        let path = match explicit {
            Some(path) => path,
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(self),
            },
        };

        tracing::debug!(path = %path.display(), "Loading config file");
        let file = read_config_file(&path)?;
        apply_file(&mut self, file)?;
        Ok(self)
    }

    /// Read configuration from environment variables.
    ///
    /// Environment variables take precedence over config file settings.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the API URL.
    pub fn with_api_url(mut self, url: String) -> Self {
        self.api_url = Some(url);
        self
    }

    /// Set the customer ID.
    pub fn with_customer_id(mut self, customer_id: String) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Set the provisioning hash source.
    pub fn with_provisioning_hash(mut self, hash: SecureValue) -> Self {
        self.provisioning_hash = Some(hash);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Restrict collection to the given inputs.
    pub fn with_inputs(mut self, inputs: Vec<InputType>) -> Self {
        self.inputs = Some(inputs);
        self
    }

    /// Set the polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_secs = Some(interval.as_secs());
        self
    }

    /// Set the output sink.
    pub fn with_sink(mut self, sink: SinkKind) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the checkpoint directory.
    pub fn with_checkpoint_dir(mut self, dir: PathBuf) -> Self {
        self.checkpoint_dir = Some(dir);
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let base_url = normalize_https_url(self.api_url.as_deref().unwrap_or_default())?;

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 || timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout {
                message: format!("must be between 1 and {MAX_TIMEOUT_SECS} seconds"),
            });
        }

        let max_retries = self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES);
        if max_retries > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidMaxRetries {
                message: format!("must not exceed {MAX_MAX_RETRIES}"),
            });
        }

        let max_pages = self.max_pages.unwrap_or(DEFAULT_MAX_PAGES);
        if max_pages == 0 {
            return Err(ConfigError::invalid("max_pages", "must be at least 1"));
        }
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ConfigError::invalid("page_size", "must be at least 1"));
        }

        let utc_offset_minutes = self.utc_offset_minutes.unwrap_or(0);
        if !UTC_OFFSET_RANGE_MINUTES.contains(&utc_offset_minutes) {
            return Err(ConfigError::invalid(
                "api_utc_offset_minutes",
                "must be between -720 and 840",
            ));
        }

        let poll_secs = self.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        if !(MIN_POLL_INTERVAL_SECS..=MAX_POLL_INTERVAL_SECS).contains(&poll_secs) {
            return Err(ConfigError::InvalidPollInterval {
                message: format!(
                    "must be between {MIN_POLL_INTERVAL_SECS} and {MAX_POLL_INTERVAL_SECS} seconds"
                ),
            });
        }

        let api = ApiConfig {
            base_url,
            api_user: self
                .api_user
                .unwrap_or_else(|| DEFAULT_API_USER.to_string()),
            auth_scheme: self.auth_scheme.unwrap_or_default(),
            timeout: Duration::from_secs(timeout_secs),
            max_retries,
            max_pages,
            page_size,
            utc_offset_minutes,
        };

        let time_start = self
            .time_start
            .as_deref()
            .map(|value| parse_time_start(value, api.utc_offset(), Utc::now()))
            .transpose()?;

        let inputs = self.inputs.unwrap_or_else(|| InputType::ALL.to_vec());
        if inputs.is_empty() {
            return Err(ConfigError::invalid("inputs", "at least one input is required"));
        }

        let sink = self.sink.unwrap_or_default();
        let hec = match (sink, self.hec_url, self.hec_token) {
            (SinkKind::Hec, Some(url), Some(token)) => Some(HecConfig {
                url: normalize_hec_url(&url)?,
                token: token.resolve()?,
            }),
            (SinkKind::Hec, _, _) => return Err(ConfigError::MissingHecSettings),
            _ => None,
        };

        let checkpoint_dir = match self.checkpoint_dir {
            Some(dir) => dir,
            None => default_checkpoint_dir()?,
        };

        Ok(Config {
            api,
            credentials: CredentialConfig {
                customer_id: self.customer_id,
                provisioning_hash: self.provisioning_hash,
            },
            collection: CollectionConfig {
                inputs,
                poll_interval: Duration::from_secs(poll_secs),
                time_start,
            },
            output: OutputConfig {
                index: self.index.unwrap_or_else(|| DEFAULT_INDEX.to_string()),
                host: self.host,
                sink,
                hec,
            },
            checkpoint_dir,
        })
    }

    // Internal setters for use by other loader modules

    pub(crate) fn set_api_url(&mut self, url: Option<String>) {
        self.api_url = url;
    }

    pub(crate) fn set_api_user(&mut self, user: Option<String>) {
        self.api_user = user;
    }

    pub(crate) fn set_auth_scheme(&mut self, scheme: Option<AuthScheme>) {
        self.auth_scheme = scheme;
    }

    pub(crate) fn set_customer_id(&mut self, customer_id: Option<String>) {
        self.customer_id = customer_id;
    }

    pub(crate) fn set_provisioning_hash(&mut self, hash: Option<SecureValue>) {
        self.provisioning_hash = hash;
    }

    pub(crate) fn set_timeout_secs(&mut self, secs: Option<u64>) {
        self.timeout_secs = secs;
    }

    pub(crate) fn set_max_retries(&mut self, retries: Option<usize>) {
        self.max_retries = retries;
    }

    pub(crate) fn set_max_pages(&mut self, pages: Option<usize>) {
        self.max_pages = pages;
    }

    pub(crate) fn set_page_size(&mut self, size: Option<usize>) {
        self.page_size = size;
    }

    pub(crate) fn set_utc_offset_minutes(&mut self, minutes: Option<i32>) {
        self.utc_offset_minutes = minutes;
    }

    pub(crate) fn set_time_start(&mut self, start: Option<String>) {
        self.time_start = start;
    }

    pub(crate) fn set_inputs(&mut self, inputs: Option<Vec<InputType>>) {
        self.inputs = inputs;
    }

    pub(crate) fn set_poll_interval_secs(&mut self, secs: Option<u64>) {
        self.poll_interval_secs = secs;
    }

    pub(crate) fn set_index(&mut self, index: Option<String>) {
        self.index = index;
    }

    pub(crate) fn set_host(&mut self, host: Option<String>) {
        self.host = host;
    }

    pub(crate) fn set_sink(&mut self, sink: Option<SinkKind>) {
        self.sink = sink;
    }

    pub(crate) fn set_hec_url(&mut self, url: Option<String>) {
        self.hec_url = url;
    }

    pub(crate) fn set_hec_token(&mut self, token: Option<SecureValue>) {
        self.hec_token = token;
    }

    pub(crate) fn set_checkpoint_dir(&mut self, dir: Option<PathBuf>) {
        self.checkpoint_dir = dir;
    }
}

/// HEC URLs have no default; blank is treated as missing.
fn normalize_hec_url(raw: &str) -> Result<String, ConfigError> {
    if raw.trim().is_empty() {
        return Err(ConfigError::MissingHecSettings);
    }
    Ok(normalize_https_url(raw)?.trim_end_matches('/').to_string())
}

/// Default config file location: `<config dir>/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().join("config.json"))
}

/// Default checkpoint directory: `<data dir>/checkpoints`.
pub fn default_checkpoint_dir() -> Result<PathBuf, ConfigError> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().join("checkpoints"))
        .ok_or_else(|| {
            ConfigError::DataDirUnavailable("no home directory for this user".to_string())
        })
}
