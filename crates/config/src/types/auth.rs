//! Authentication types for LastPass collector configuration.
//!
//! Responsibilities:
//! - Define how the provisioning hash is presented to the vendor API (`AuthScheme`).
//! - Provide secure value storage (plain text or keyring).
//! - Define the resolved per-tick `Credential`.
//!
//! Does NOT handle:
//! - Building authenticated requests (see client crate).
//! - Validating credential shape (see `credentials` module).
//!
//! Invariants:
//! - All secret values use `secrecy::SecretString` to prevent accidental logging.
//! - `KEYRING_SERVICE` is the canonical service name for all keyring operations.

use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::constants::APP_NAME;

/// Module for serializing SecretString as strings.
mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize as DeserializeTrait, Serialize as SerializeTrait};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret.expose_secret().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString::new(s.into()))
    }
}

/// How the provisioning hash is attached to API requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// `cid` and `provhash` travel inside the JSON request envelope.
    #[default]
    #[serde(rename = "provhash")]
    ProvisioningHash,
    /// `cid` in the envelope, provisioning hash as a bearer token.
    Bearer,
}

impl FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "provhash" | "provisioning_hash" => Ok(Self::ProvisioningHash),
            "bearer" => Ok(Self::Bearer),
            other => Err(format!("unknown auth scheme '{other}' (expected provhash or bearer)")),
        }
    }
}

/// Service name used for keyring storage.
pub const KEYRING_SERVICE: &str = APP_NAME;

/// A value that can be stored either in plain text or in the system keyring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecureValue {
    /// Value stored in the system keyring.
    Keyring {
        /// The account name in the keyring.
        keyring_account: String,
    },
    /// Value stored in plain text (as a SecretString).
    #[serde(with = "secret_string")]
    Plain(SecretString),
}

impl SecureValue {
    /// Resolve the secure value to a SecretString.
    ///
    /// If the value is stored in the keyring, it is fetched on every call.
    pub fn resolve(&self) -> Result<SecretString, keyring::Error> {
        match self {
            Self::Plain(secret) => Ok(secret.clone()),
            Self::Keyring { keyring_account } => {
                let entry = keyring::Entry::new(KEYRING_SERVICE, keyring_account)?;
                let password = entry.get_password()?;
                Ok(SecretString::new(password.into()))
            }
        }
    }
}

/// Customer ID and provisioning hash used to authenticate one tick.
#[derive(Clone)]
pub struct Credential {
    customer_id: String,
    provisioning_hash: SecretString,
}

impl Credential {
    pub fn new(customer_id: impl Into<String>, provisioning_hash: SecretString) -> Self {
        Self {
            customer_id: customer_id.into(),
            provisioning_hash,
        }
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn provisioning_hash(&self) -> &SecretString {
        &self.provisioning_hash
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("customer_id", &self.customer_id)
            .field("provisioning_hash", &"[REDACTED]")
            .finish()
    }
}
