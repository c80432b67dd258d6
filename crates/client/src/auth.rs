//! Authentication strategies for LastPass Enterprise API requests.
//!
//! Responsibilities:
//! - Decide where the provisioning hash travels (envelope field or header).
//!
//! Does NOT handle:
//! - Resolving credentials from configuration (see `lastpass_config::CredentialResolver`).
//!
//! Invariants:
//! - The customer ID is always sent in the envelope.
//! - The hash is exposed only while the request is being built.

use lastpass_config::{AuthScheme, Credential};
use reqwest::RequestBuilder;
use secrecy::ExposeSecret;

/// How the provisioning hash is attached to a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthStrategy {
    /// `provhash` field inside the JSON envelope.
    #[default]
    ProvisioningHash,
    /// `Authorization: Bearer <hash>` header; `provhash` is omitted.
    BearerToken,
}

impl AuthStrategy {
    /// Value for the envelope's `provhash` field, if this strategy uses it.
    pub fn envelope_hash<'a>(&self, credential: &'a Credential) -> Option<&'a str> {
        match self {
            Self::ProvisioningHash => Some(credential.provisioning_hash().expose_secret()),
            Self::BearerToken => None,
        }
    }

    /// Add any auth headers this strategy needs.
    pub fn apply(&self, builder: RequestBuilder, credential: &Credential) -> RequestBuilder {
        match self {
            Self::ProvisioningHash => builder,
            Self::BearerToken => builder.bearer_auth(credential.provisioning_hash().expose_secret()),
        }
    }
}

impl From<AuthScheme> for AuthStrategy {
    fn from(scheme: AuthScheme) -> Self {
        match scheme {
            AuthScheme::ProvisioningHash => Self::ProvisioningHash,
            AuthScheme::Bearer => Self::BearerToken,
        }
    }
}
