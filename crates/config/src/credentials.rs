//! Credential resolution for LastPass API calls.
//!
//! Responsibilities:
//! - Turn the configured customer ID and provisioning hash sources into a `Credential`.
//! - Reject absent or malformed values before any request is attempted.
//!
//! Does NOT handle:
//! - Attaching credentials to requests (see client crate `auth`).
//!
//! Invariants:
//! - Resolution happens once per tick and is never cached; keyring-backed
//!   hashes are re-read on every call so rotation takes effect on the next tick.
//! - Secret values never appear in error messages.

use secrecy::{ExposeSecret, SecretString};

use crate::loader::ConfigError;
use crate::types::{Credential, CredentialConfig, SecureValue};

/// Resolves the per-tick `Credential` from configured sources.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    customer_id: Option<String>,
    provisioning_hash: Option<SecureValue>,
}

impl CredentialResolver {
    pub fn new(customer_id: Option<String>, provisioning_hash: Option<SecureValue>) -> Self {
        Self {
            customer_id,
            provisioning_hash,
        }
    }

    pub fn from_config(config: &CredentialConfig) -> Self {
        Self::new(
            config.customer_id.clone(),
            config.provisioning_hash.clone(),
        )
    }

    /// Resolve and validate the credential.
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingCredential` when a value is absent or blank.
    /// - `ConfigError::MalformedCredential` when a value has the wrong shape.
    /// - `ConfigError::Keyring` when a keyring-backed hash cannot be read.
    pub fn resolve(&self) -> Result<Credential, ConfigError> {
        let customer_id = self
            .customer_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingCredential("customer ID"))?;
        validate_customer_id(customer_id)?;

        let hash = self
            .provisioning_hash
            .as_ref()
            .ok_or(ConfigError::MissingCredential("provisioning hash"))?
            .resolve()?;
        let trimmed = hash.expose_secret().trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingCredential("provisioning hash"));
        }
        validate_provisioning_hash(trimmed)?;

        Ok(Credential::new(
            customer_id,
            SecretString::new(trimmed.to_string().into()),
        ))
    }
}

fn validate_customer_id(value: &str) -> Result<(), ConfigError> {
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::MalformedCredential {
            field: "customer ID",
            message: "must contain only digits".to_string(),
        });
    }
    Ok(())
}

fn validate_provisioning_hash(value: &str) -> Result<(), ConfigError> {
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::MalformedCredential {
            field: "provisioning hash",
            message: "must contain only ASCII letters and digits".to_string(),
        });
    }
    Ok(())
}
