//! Common test utilities for integration tests.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - The mock API is mounted at [`API_PATH`]
//!
//! # What this does NOT handle
//! - Mock server setup (use wiremock directly in tests)

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use lastpass_config::Credential;
use secrecy::SecretString;

#[allow(unused_imports)]
pub use lastpass_client::testing::load_fixture;

#[allow(unused_imports)]
pub use lastpass_client::{
    AuthStrategy, ClientError, CursorPosition, FetchCursor, LastPassClient, endpoints,
};
#[allow(unused_imports)]
pub use lastpass_config::InputType;
#[allow(unused_imports)]
pub use reqwest::Client;
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the enterprise API is served on by the mock server.
pub const API_PATH: &str = "/enterpriseapi.php";

#[allow(dead_code)]
pub fn credential() -> Credential {
    Credential::new("8771312", SecretString::new("abc123def456".into()))
}

#[allow(dead_code)]
pub fn api_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), API_PATH)
}

/// A client pointed at the mock server.
#[allow(dead_code)]
pub fn client_for(server: &MockServer, max_retries: usize) -> LastPassClient {
    LastPassClient::builder()
        .base_url(api_url(server))
        .max_retries(max_retries)
        .build()
        .expect("client builds")
}

/// Fixed "now" used by fetch tests.
#[allow(dead_code)]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// An events cursor one hour before [`fixed_now`], so a fetch plans one window.
#[allow(dead_code)]
pub fn recent_events_cursor() -> FetchCursor {
    FetchCursor {
        last_seen: Some(CursorPosition::Timestamp(
            Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap(),
        )),
        ..FetchCursor::empty(InputType::Events)
    }
}

/// Advance Tokio's paused clock and yield so sleepers can observe the change.
#[allow(dead_code)]
pub async fn advance_and_yield(duration: Duration) {
    tokio::time::advance(duration).await;
    tokio::task::yield_now().await;
}

/// Assert that a task has not completed after yielding to the scheduler.
#[allow(dead_code)]
pub async fn assert_pending<T>(handle: &tokio::task::JoinHandle<T>, context: &str) {
    tokio::task::yield_now().await;
    assert!(!handle.is_finished(), "Expected pending task: {}", context);
}
