//! LastPass Enterprise API and HEC endpoint implementations.

pub mod enterprise;
pub mod hec;
pub mod parsing;
mod reporting;
mod request;
mod shared_folders;
mod userdata;

pub use enterprise::{ApiContext, post_command};
pub use reporting::{ReportingPage, fetch_events};
pub use request::{backoff_for, send_request_with_retry};
pub use shared_folders::fetch_shared_folders;
pub use userdata::{UserDataPage, fetch_user_data};
