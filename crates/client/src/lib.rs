//! LastPass Enterprise API client.
//!
//! This crate talks to the LastPass Enterprise API (`reporting`,
//! `getuserdata`, `getsfdata`) and to a Splunk HTTP Event Collector. It
//! handles authentication strategies, retries with backoff, time-windowed
//! and paged fetching, metrics, and tracing setup.

mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod metrics;
pub mod metrics_exporter;
pub mod models;
#[cfg(any(feature = "test-utils", test))]
pub mod testing;
pub mod tracing;

pub use auth::AuthStrategy;
pub use client::LastPassClient;
pub use client::builder::LastPassClientBuilder;
pub use client::pagination::Paginator;
pub use client::windows::{TimeWindow, format_vendor_time, plan_windows, resolve_start};
pub use error::{ClientError, Result};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use models::{
    ApiResponse, Command, CursorPosition, FetchBatch, FetchCursor, HecEvent, HecHealth,
    HecResponse, MalformedRecord, Page, RawRecord,
};
