//! Validation and normalization of user-supplied settings.
//!
//! Responsibilities:
//! - Normalize the API URL (bare domains gain `https://`, `http://` is rejected).
//! - Parse the configured start time (epoch seconds or vendor time format).
//!
//! Invariants:
//! - A configured start time is never in the future and never older than
//!   `MAX_TIME_START_AGE_DAYS`.
//! - Naive vendor timestamps are interpreted in the configured UTC offset.

use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, NaiveDateTime, TimeZone, Utc};

use super::error::ConfigError;
use crate::constants::{DEFAULT_API_URL, LASTPASS_TIME_FORMAT, MAX_TIME_START_AGE_DAYS};

/// Normalize and validate an API or HEC URL.
///
/// Empty input falls back to `DEFAULT_API_URL`.
pub fn normalize_https_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_API_URL.to_string());
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("https://") {
        trimmed.to_string()
    } else if lower.starts_with("http://") {
        return Err(ConfigError::InsecureUrl(trimmed.to_string()));
    } else if !trimmed.contains('.') && !trimmed.contains(':') {
        return Err(ConfigError::InvalidUrl {
            url: trimmed.to_string(),
            message: "not a valid domain".to_string(),
        });
    } else {
        format!("https://{trimmed}")
    };

    let parsed = url::Url::parse(&candidate).map_err(|e| ConfigError::InvalidUrl {
        url: trimmed.to_string(),
        message: e.to_string(),
    })?;
    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl {
            url: trimmed.to_string(),
            message: "missing host".to_string(),
        });
    }

    Ok(candidate)
}

/// Parse a vendor-format or epoch timestamp without range checks.
pub fn parse_vendor_time(value: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(secs) = value.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }
    if let Ok(secs) = value.parse::<f64>() {
        if secs.is_finite() && secs > 0.0 {
            let whole = secs.trunc() as i64;
            let nanos = ((secs - secs.trunc()) * 1e9) as u32;
            return DateTime::from_timestamp(whole, nanos);
        }
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(value, LASTPASS_TIME_FORMAT).ok()?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse and range-check a configured collection start time.
pub fn parse_time_start(
    value: &str,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ConfigError> {
    let parsed = parse_vendor_time(value, offset).ok_or_else(|| ConfigError::InvalidTimeStart {
        value: value.to_string(),
        message: format!("expected epoch seconds or '{LASTPASS_TIME_FORMAT}'"),
    })?;

    if parsed > now {
        return Err(ConfigError::InvalidTimeStart {
            value: value.to_string(),
            message: "start time is in the future".to_string(),
        });
    }
    if now - parsed > ChronoDuration::days(MAX_TIME_START_AGE_DAYS) {
        return Err(ConfigError::InvalidTimeStart {
            value: value.to_string(),
            message: format!("start time is older than {MAX_TIME_START_AGE_DAYS} days"),
        });
    }
    Ok(parsed)
}
