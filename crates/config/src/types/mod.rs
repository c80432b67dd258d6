//! Configuration type definitions for the LastPass collector.
//!
//! Responsibilities:
//! - Define configuration types for the vendor API, credentials, collection, and output.
//! - Provide serialization helpers for sensitive types (secrets, durations).
//!
//! Does NOT handle:
//! - Configuration loading from files or environment variables (see `loader` module).
//! - Validating or resolving credentials (see `credentials` module).
//!
//! Invariants:
//! - All secret types use `secrecy::SecretString` to prevent accidental logging.
//! - `KEYRING_SERVICE` is the canonical service name for all keyring operations.

mod auth;
pub(crate) mod connection;
mod input;

pub use auth::{AuthScheme, Credential, KEYRING_SERVICE, SecureValue};
pub use connection::{
    ApiConfig, CollectionConfig, Config, CredentialConfig, HecConfig, OutputConfig, SinkKind,
};
pub use input::{InputType, parse_input_list};
