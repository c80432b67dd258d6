//! Configuration management for the LastPass collector.
//!
//! This crate provides types and loaders for the LastPass Enterprise API
//! connection, credential resolution, collection scheduling, and output
//! settings, read from a JSON config file and environment variables.

pub mod constants;
pub mod credentials;
mod loader;
pub mod types;

pub use credentials::CredentialResolver;
pub use loader::{
    ConfigError, ConfigFile, ConfigLoader, default_checkpoint_dir, default_config_path,
    env_var_or_none, normalize_https_url, parse_vendor_time,
};
pub use types::{
    ApiConfig, AuthScheme, CollectionConfig, Config, Credential, CredentialConfig, HecConfig,
    InputType, OutputConfig, SecureValue, SinkKind,
};
