//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `LASTPASS_*` environment variables.
//! - Apply environment variable values to a ConfigLoader instance.
//! - Provide helper functions for reading env vars with empty/whitespace filtering.
//!
//! Does NOT handle:
//! - Loading from config files (see file.rs).
//! - Building the final Config (see builder.rs).
//! - .env file loading (handled by ConfigLoader::load_dotenv).
//!
//! Invariants:
//! - Environment variables take precedence over config file settings.
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid numeric values return ConfigError::InvalidValue.

use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::types::{SecureValue, parse_input_list};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_env<T: FromStr>(key: &str, value: &str, expected: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::invalid(key, format!("must be {expected}")))
}

/// Apply environment variable configuration to the loader.
///
/// Environment variables take precedence over config file settings.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(url) = env_var_or_none("LASTPASS_API_URL") {
        loader.set_api_url(Some(url));
    }
    if let Some(user) = env_var_or_none("LASTPASS_API_USER") {
        loader.set_api_user(Some(user));
    }
    if let Some(scheme) = env_var_or_none("LASTPASS_AUTH_SCHEME") {
        loader.set_auth_scheme(Some(scheme.parse().map_err(|message: String| {
            ConfigError::invalid("LASTPASS_AUTH_SCHEME", message)
        })?));
    }
    if let Some(cid) = env_var_or_none("LASTPASS_CID") {
        loader.set_customer_id(Some(cid));
    }
    if let Some(hash) = env_var_or_none("LASTPASS_PROVHASH") {
        loader.set_provisioning_hash(Some(SecureValue::Plain(SecretString::new(hash.into()))));
    } else if let Some(account) = env_var_or_none("LASTPASS_PROVHASH_KEYRING") {
        loader.set_provisioning_hash(Some(SecureValue::Keyring {
            keyring_account: account,
        }));
    }
    if let Some(timeout) = env_var_or_none("LASTPASS_TIMEOUT") {
        loader.set_timeout_secs(Some(parse_env(
            "LASTPASS_TIMEOUT",
            &timeout,
            "a number",
        )?));
    }
    if let Some(retries) = env_var_or_none("LASTPASS_MAX_RETRIES") {
        loader.set_max_retries(Some(parse_env(
            "LASTPASS_MAX_RETRIES",
            &retries,
            "a non-negative integer",
        )?));
    }
    if let Some(pages) = env_var_or_none("LASTPASS_MAX_PAGES") {
        loader.set_max_pages(Some(parse_env(
            "LASTPASS_MAX_PAGES",
            &pages,
            "a positive integer",
        )?));
    }
    if let Some(size) = env_var_or_none("LASTPASS_PAGE_SIZE") {
        loader.set_page_size(Some(parse_env(
            "LASTPASS_PAGE_SIZE",
            &size,
            "a positive integer",
        )?));
    }
    if let Some(offset) = env_var_or_none("LASTPASS_API_UTC_OFFSET") {
        loader.set_utc_offset_minutes(Some(parse_env(
            "LASTPASS_API_UTC_OFFSET",
            &offset,
            "an offset in minutes",
        )?));
    }
    if let Some(start) = env_var_or_none("LASTPASS_TIME_START") {
        loader.set_time_start(Some(start));
    }
    if let Some(inputs) = env_var_or_none("LASTPASS_INPUTS") {
        loader.set_inputs(Some(
            parse_input_list(&inputs)
                .map_err(|message| ConfigError::invalid("LASTPASS_INPUTS", message))?,
        ));
    }
    if let Some(interval) = env_var_or_none("LASTPASS_POLL_INTERVAL") {
        loader.set_poll_interval_secs(Some(parse_env(
            "LASTPASS_POLL_INTERVAL",
            &interval,
            "a number of seconds",
        )?));
    }
    if let Some(index) = env_var_or_none("LASTPASS_INDEX") {
        loader.set_index(Some(index));
    }
    if let Some(host) = env_var_or_none("LASTPASS_HOST") {
        loader.set_host(Some(host));
    }
    if let Some(sink) = env_var_or_none("LASTPASS_SINK") {
        loader.set_sink(Some(sink.parse().map_err(|message: String| {
            ConfigError::invalid("LASTPASS_SINK", message)
        })?));
    }
    if let Some(url) = env_var_or_none("LASTPASS_HEC_URL") {
        loader.set_hec_url(Some(url));
    }
    if let Some(token) = env_var_or_none("LASTPASS_HEC_TOKEN") {
        loader.set_hec_token(Some(SecureValue::Plain(SecretString::new(token.into()))));
    }
    if let Some(dir) = env_var_or_none("LASTPASS_CHECKPOINT_DIR") {
        loader.set_checkpoint_dir(Some(PathBuf::from(dir)));
    }
    Ok(())
}
