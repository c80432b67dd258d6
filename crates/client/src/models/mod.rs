//! Data models for LastPass Enterprise API requests and responses.
//!
//! Submodules:
//! - `envelope`: request envelope, per-command query data, response parsing
//! - `records`: raw records, pages, and fetch batches
//! - `cursor`: persisted fetch position
//! - `hec`: Splunk HTTP Event Collector payloads

pub mod cursor;
pub mod envelope;
pub mod hec;
pub mod records;

pub use cursor::{CursorPosition, FetchCursor};
pub use envelope::{ApiResponse, Command, ReportingQuery, RequestEnvelope, UserDataQuery};
pub use hec::{HecEvent, HecHealth, HecResponse};
pub use records::{FetchBatch, MalformedRecord, Page, RawRecord};
