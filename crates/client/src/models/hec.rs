//! HEC (HTTP Event Collector) models for Splunk event ingestion.
//!
//! # What this module handles:
//! - Event payloads with index/source/sourcetype/host/time metadata
//! - Batch submission responses
//! - Health check responses
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (see [`crate::endpoints::hec`])
//!
//! # Invariants
//! - The `event` field is required and can be any JSON-serializable value
//! - Time is epoch seconds with a fractional part for sub-second precision

use serde::{Deserialize, Serialize};

/// A single HEC event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HecEvent {
    /// The event data. This is the only required field.
    pub event: serde_json::Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcetype: Option<String>,

    /// Host field (defaults to sender IP if not specified).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Event timestamp in Unix epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
}

impl HecEvent {
    /// Create a new HEC event with just the event data.
    pub fn new(event: serde_json::Value) -> Self {
        Self {
            event,
            index: None,
            source: None,
            sourcetype: None,
            host: None,
            time: None,
        }
    }

    /// Set the destination index.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Set the source field.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the sourcetype field.
    pub fn with_sourcetype(mut self, sourcetype: impl Into<String>) -> Self {
        self.sourcetype = Some(sourcetype.into());
        self
    }

    /// Set the host field.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the event timestamp.
    pub fn with_time(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }
}

/// HEC response for a batch submission.
///
/// Code 0 indicates success; non-zero codes indicate errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HecResponse {
    pub code: i32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack_id: Option<u64>,
}

impl HecResponse {
    /// Check if the response indicates success.
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Human-readable description of the response code.
    pub fn description(&self) -> String {
        match self.code {
            0 => "Success".to_string(),
            1 => "Token disabled".to_string(),
            2 => "Token is required".to_string(),
            3 => "Invalid authorization".to_string(),
            4 => "Invalid token".to_string(),
            5 => "No data".to_string(),
            6 => "Invalid data format".to_string(),
            7 => "Incorrect index".to_string(),
            8 => "Internal server error".to_string(),
            9 => "Server is busy".to_string(),
            _ => format!("HEC error code {}", self.code),
        }
    }
}

/// HEC health check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HecHealth {
    pub text: String,
    pub code: u16,
}

impl HecHealth {
    /// Check if the health check indicates a healthy status.
    pub fn is_healthy(&self) -> bool {
        self.code == 200 && self.text.to_lowercase().contains("healthy")
    }
}
