//! Connection and collection configuration types.
//!
//! Responsibilities:
//! - Define vendor API settings (URL, auth scheme, timeouts, retries, pagination).
//! - Define collection scheduling, output sink, and checkpoint settings.
//! - Define the main `Config` structure combining them.
//! - Provide serialization helpers for `Duration`.
//!
//! Does NOT handle:
//! - Configuration loading from files/env (see `loader` module).
//! - Actual network connections (see client crate).
//!
//! Invariants:
//! - All duration fields are serialized as seconds (integers).
//! - Default values come from `constants`, not magic numbers.
//! - Credentials are optional here; the credential resolver decides whether they are usable.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_API_USER, DEFAULT_INDEX, DEFAULT_MAX_PAGES, DEFAULT_MAX_RETRIES,
    DEFAULT_PAGE_SIZE, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS,
};
use crate::types::auth::{AuthScheme, SecureValue};
use crate::types::input::InputType;

/// Module for serializing Duration as seconds (integer).
mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// LastPass Enterprise API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Full HTTPS URL of the enterprise API endpoint.
    pub base_url: String,
    /// Value sent as `apiuser` in every request envelope.
    pub api_user: String,
    /// How the provisioning hash is attached to requests.
    pub auth_scheme: AuthScheme,
    /// Per-request timeout (serialized as seconds).
    #[serde(with = "duration_seconds")]
    pub timeout: Duration,
    /// Maximum retries for transient failures.
    pub max_retries: usize,
    /// Maximum pages followed per query window.
    pub max_pages: usize,
    /// Page size for paged inventory commands.
    pub page_size: usize,
    /// Offset of vendor timestamps from UTC, in minutes.
    pub utc_offset_minutes: i32,
}

impl ApiConfig {
    /// Vendor timestamp offset as a chrono `FixedOffset`.
    ///
    /// Out-of-range values (validated at load time) fall back to UTC.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_user: DEFAULT_API_USER.to_string(),
            auth_scheme: AuthScheme::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            max_pages: DEFAULT_MAX_PAGES,
            page_size: DEFAULT_PAGE_SIZE,
            utc_offset_minutes: 0,
        }
    }
}

/// Credential sources, resolved once per tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// LastPass customer ID (`cid`).
    pub customer_id: Option<String>,
    /// Provisioning hash, inline or via keyring.
    pub provisioning_hash: Option<SecureValue>,
}

/// What to collect and how often.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Enabled input types.
    pub inputs: Vec<InputType>,
    /// Interval between scheduled ticks (serialized as seconds).
    #[serde(with = "duration_seconds")]
    pub poll_interval: Duration,
    /// Earliest event time to collect when no checkpoint exists yet.
    pub time_start: Option<DateTime<Utc>>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            inputs: InputType::ALL.to_vec(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            time_start: None,
        }
    }
}

/// Where canonical events are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// Splunk modular-input XML stream on stdout.
    #[default]
    Stream,
    /// Newline-delimited JSON on stdout.
    Ndjson,
    /// Splunk HTTP Event Collector.
    Hec,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SinkKind::Stream => "stream",
            SinkKind::Ndjson => "ndjson",
            SinkKind::Hec => "hec",
        })
    }
}

impl FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stream" | "xml" => Ok(SinkKind::Stream),
            "ndjson" | "json" => Ok(SinkKind::Ndjson),
            "hec" => Ok(SinkKind::Hec),
            other => Err(format!("unknown sink '{other}' (expected stream, ndjson, hec)")),
        }
    }
}

/// HEC endpoint settings, required when `SinkKind::Hec` is selected.
#[derive(Debug, Clone)]
pub struct HecConfig {
    pub url: String,
    pub token: SecretString,
}

/// Output settings for emitted events.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Destination index.
    pub index: String,
    /// Host field stamped on each event, if set.
    pub host: Option<String>,
    /// Selected sink.
    pub sink: SinkKind,
    /// HEC settings when the HEC sink is used.
    pub hec: Option<HecConfig>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            index: DEFAULT_INDEX.to_string(),
            host: None,
            sink: SinkKind::default(),
            hec: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub credentials: CredentialConfig,
    pub collection: CollectionConfig,
    pub output: OutputConfig,
    /// Directory holding one checkpoint file per input type.
    pub checkpoint_dir: PathBuf,
}

impl Config {
    /// Create a config with default settings and the given inline credentials.
    ///
    /// Intended for tests and embedding; production configuration goes through
    /// `ConfigLoader`.
    pub fn with_credentials(
        base_url: impl Into<String>,
        customer_id: impl Into<String>,
        provisioning_hash: SecretString,
        checkpoint_dir: PathBuf,
    ) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                ..ApiConfig::default()
            },
            credentials: CredentialConfig {
                customer_id: Some(customer_id.into()),
                provisioning_hash: Some(SecureValue::Plain(provisioning_hash)),
            },
            collection: CollectionConfig::default(),
            output: OutputConfig::default(),
            checkpoint_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_defaults() {
        let api = ApiConfig::default();
        assert_eq!(api.base_url, "https://lastpass.com/enterpriseapi.php");
        assert_eq!(api.api_user, "splunk.collector");
        assert_eq!(api.timeout, Duration::from_secs(30));
        assert_eq!(api.max_retries, 3);
        assert_eq!(api.auth_scheme, AuthScheme::ProvisioningHash);
    }

    #[test]
    fn test_api_config_serializes_timeout_as_seconds() {
        let api = ApiConfig::default();
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["timeout"], 30);
        assert_eq!(json["auth_scheme"], "provhash");
    }

    #[test]
    fn test_utc_offset_conversion() {
        let api = ApiConfig {
            utc_offset_minutes: -480,
            ..ApiConfig::default()
        };
        assert_eq!(api.utc_offset().local_minus_utc(), -8 * 3600);
    }

    #[test]
    fn test_collection_defaults_enable_all_inputs() {
        let collection = CollectionConfig::default();
        assert_eq!(collection.inputs.len(), 4);
        assert_eq!(collection.poll_interval, Duration::from_secs(300));
        assert!(collection.time_start.is_none());
    }

    #[test]
    fn test_sink_kind_parsing() {
        assert_eq!("HEC".parse::<SinkKind>(), Ok(SinkKind::Hec));
        assert_eq!("xml".parse::<SinkKind>(), Ok(SinkKind::Stream));
        assert!("kafka".parse::<SinkKind>().is_err());
    }
}
