//! Centralized constants for the LastPass collector workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Vendor API Defaults
// =============================================================================

/// Default LastPass Enterprise API endpoint.
pub const DEFAULT_API_URL: &str = "https://lastpass.com/enterpriseapi.php";

/// Value sent in the `apiuser` envelope field.
pub const DEFAULT_API_USER: &str = "splunk.collector";

/// Timestamp format used by the LastPass reporting API.
pub const LASTPASS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed request timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default maximum number of retries for failed requests.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Maximum allowed value for `max_retries`.
pub const MAX_MAX_RETRIES: usize = 10;

/// Upper bound for a single retry backoff in seconds.
pub const MAX_BACKOFF_SECS: u64 = 60;

// =============================================================================
// Pagination & Windowing Defaults
// =============================================================================

/// Default maximum number of pages fetched per query window.
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Default page size for `getuserdata` requests.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Lookback used when neither a checkpoint nor a start time exists.
pub const DEFAULT_LOOKBACK_HOURS: i64 = 24;

/// Oldest accepted configured start time, in days.
pub const MAX_TIME_START_AGE_DAYS: i64 = 365 * 4;

/// Ranges spanning at least this many days are queried in wider windows.
pub const WIDE_WINDOW_THRESHOLD_DAYS: i64 = 7;

/// Width of a wide reporting window, in days.
pub const WIDE_WINDOW_DAYS: i64 = 3;

// =============================================================================
// Scheduling & Output Defaults
// =============================================================================

/// Default polling interval in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

/// Minimum allowed polling interval in seconds.
pub const MIN_POLL_INTERVAL_SECS: u64 = 10;

/// Maximum allowed polling interval in seconds (1 day).
pub const MAX_POLL_INTERVAL_SECS: u64 = 86_400;

/// Default destination index.
pub const DEFAULT_INDEX: &str = "main";

/// Application name used for platform directories and keyring entries.
pub const APP_NAME: &str = "lastpass-collector";
