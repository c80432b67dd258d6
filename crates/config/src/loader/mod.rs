//! Configuration loader for environment variables and files.
//!
//! Responsibilities:
//! - Load configuration from `.env` files, environment variables, and a JSON config file.
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Enforce `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Resolving credentials (see `credentials` module).
//! - Interaction with system keyrings directly (delegated to `SecureValue::resolve()`).
//!
//! Invariants / Assumptions:
//! - Environment variables take precedence over config file values.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

mod builder;
mod env;
mod error;
mod file;
mod validation;

#[cfg(test)]
mod tests;

pub use builder::{ConfigLoader, default_checkpoint_dir, default_config_path};
pub use env::env_var_or_none;
pub use error::ConfigError;
pub use file::ConfigFile;
pub use validation::{normalize_https_url, parse_vendor_time};
