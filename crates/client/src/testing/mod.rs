//! Testing utilities for LastPass client tests.
//!
//! Fixture loading and payload generators. Available when running tests or
//! when the `test-utils` feature is enabled.
//!
//! # Example
//! ```ignore
//! use lastpass_client::testing::{load_fixture, generators::ReportingEventGenerator};
//!
//! let fixture = load_fixture("reporting/page_one.json");
//! let page = ReportingEventGenerator::new().with_count(100).generate_response(None);
//! ```

#[cfg(any(feature = "test-utils", test))]
pub mod generators;

use std::path::Path;

/// Load a JSON fixture file from the fixtures directory.
///
/// # Panics
/// - If the fixture file cannot be read
/// - If the file content is not valid JSON
pub fn load_fixture(fixture_path: &str) -> serde_json::Value {
    let full_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(fixture_path);
    let content = std::fs::read_to_string(&full_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", full_path.display()));
    serde_json::from_str(&content).expect("Invalid JSON in fixture")
}
