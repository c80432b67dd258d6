//! JSON config file loading.
//!
//! Responsibilities:
//! - Define the on-disk config file representation.
//! - Read a config file and apply its values to a `ConfigLoader`.
//!
//! Does NOT handle:
//! - Environment variable parsing (see env.rs).
//! - Building the final `Config` (see builder.rs).
//!
//! Invariants:
//! - Every field is optional; absent fields leave the loader untouched.
//! - Parse errors name the path and serde's position, never the file content.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::types::SecureValue;

/// Config file contents. Mirrors the `LASTPASS_*` environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub api_user: Option<String>,
    pub auth_scheme: Option<String>,
    pub customer_id: Option<String>,
    pub provisioning_hash: Option<SecureValue>,
    pub timeout_seconds: Option<u64>,
    pub max_retries: Option<usize>,
    pub max_pages: Option<usize>,
    pub page_size: Option<usize>,
    pub api_utc_offset_minutes: Option<i32>,
    pub time_start: Option<String>,
    pub inputs: Option<Vec<String>>,
    pub poll_interval_seconds: Option<u64>,
    pub index: Option<String>,
    pub host: Option<String>,
    pub sink: Option<String>,
    pub hec_url: Option<String>,
    pub hec_token: Option<SecureValue>,
    pub checkpoint_dir: Option<PathBuf>,
}

/// Read and parse a config file.
pub fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|_| ConfigError::ConfigFileRead {
        path: path.to_path_buf(),
    })?;
    serde_json::from_str(&content).map_err(|e| ConfigError::ConfigFileParse {
        path: path.to_path_buf(),
        message: format!("line {}, column {}", e.line(), e.column()),
    })
}

/// Apply config file values to the loader.
pub fn apply_file(loader: &mut ConfigLoader, file: ConfigFile) -> Result<(), ConfigError> {
    if let Some(url) = file.api_url {
        loader.set_api_url(Some(url));
    }
    if let Some(user) = file.api_user {
        loader.set_api_user(Some(user));
    }
    if let Some(scheme) = file.auth_scheme {
        loader.set_auth_scheme(Some(
            scheme
                .parse()
                .map_err(|message: String| ConfigError::invalid("auth_scheme", message))?,
        ));
    }
    if let Some(cid) = file.customer_id {
        loader.set_customer_id(Some(cid));
    }
    if let Some(hash) = file.provisioning_hash {
        loader.set_provisioning_hash(Some(hash));
    }
    if let Some(secs) = file.timeout_seconds {
        loader.set_timeout_secs(Some(secs));
    }
    if let Some(retries) = file.max_retries {
        loader.set_max_retries(Some(retries));
    }
    if let Some(pages) = file.max_pages {
        loader.set_max_pages(Some(pages));
    }
    if let Some(size) = file.page_size {
        loader.set_page_size(Some(size));
    }
    if let Some(offset) = file.api_utc_offset_minutes {
        loader.set_utc_offset_minutes(Some(offset));
    }
    if let Some(start) = file.time_start {
        loader.set_time_start(Some(start));
    }
    if let Some(inputs) = file.inputs {
        loader.set_inputs(Some(
            crate::types::parse_input_list(&inputs.join(","))
                .map_err(|message| ConfigError::invalid("inputs", message))?,
        ));
    }
    if let Some(secs) = file.poll_interval_seconds {
        loader.set_poll_interval_secs(Some(secs));
    }
    if let Some(index) = file.index {
        loader.set_index(Some(index));
    }
    if let Some(host) = file.host {
        loader.set_host(Some(host));
    }
    if let Some(sink) = file.sink {
        loader.set_sink(Some(
            sink.parse()
                .map_err(|message: String| ConfigError::invalid("sink", message))?,
        ));
    }
    if let Some(url) = file.hec_url {
        loader.set_hec_url(Some(url));
    }
    if let Some(token) = file.hec_token {
        loader.set_hec_token(Some(token));
    }
    if let Some(dir) = file.checkpoint_dir {
        loader.set_checkpoint_dir(Some(dir));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_config_file_with_keyring_hash() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "customer_id": "8771312",
                "provisioning_hash": {{"keyring_account": "lastpass-prod"}},
                "inputs": ["events", "users"],
                "poll_interval_seconds": 600
            }}"#
        )
        .unwrap();

        let parsed = read_config_file(file.path()).unwrap();
        assert_eq!(parsed.customer_id.as_deref(), Some("8771312"));
        assert!(matches!(
            parsed.provisioning_hash,
            Some(SecureValue::Keyring { .. })
        ));
        assert_eq!(parsed.poll_interval_seconds, Some(600));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"customer": "1"}}"#).unwrap();

        assert!(matches!(
            read_config_file(file.path()),
            Err(ConfigError::ConfigFileParse { .. })
        ));
    }

    #[test]
    fn test_parse_error_does_not_echo_content() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"provisioning_hash": "topsecret""#).unwrap();

        let message = read_config_file(file.path()).unwrap_err().to_string();
        assert!(!message.contains("topsecret"));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_config_file(Path::new("/nonexistent/lastpass.json")),
            Err(ConfigError::ConfigFileRead { .. })
        ));
    }
}
