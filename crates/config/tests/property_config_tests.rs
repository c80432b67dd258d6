//! Property-based tests for configuration parsing.
//!
//! Test coverage:
//! - Input lists: any permutation with duplicates parses to the unique set in first-seen order
//! - URL normalization: bare domains always gain `https://` and plain HTTP is always rejected
//! - Credential resolution: digit-only IDs and alphanumeric hashes always resolve

use proptest::prelude::*;
use secrecy::{ExposeSecret, SecretString};

use lastpass_config::{
    ConfigError, CredentialResolver, InputType, SecureValue, normalize_https_url,
};

fn input_name_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("events"),
        Just("users"),
        Just("groups"),
        Just("shared_folders"),
    ]
}

fn domain_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{1,12}", prop_oneof![Just("com"), Just("eu"), Just("io")])
        .prop_map(|(host, tld)| format!("{host}.{tld}"))
}

proptest! {
    #[test]
    fn prop_input_list_dedupes_in_order(names in prop::collection::vec(input_name_strategy(), 1..12)) {
        let joined = names.join(",");
        let parsed = lastpass_config::types::parse_input_list(&joined).unwrap();

        let mut expected: Vec<InputType> = Vec::new();
        for name in &names {
            let input: InputType = name.parse().unwrap();
            if !expected.contains(&input) {
                expected.push(input);
            }
        }
        prop_assert_eq!(parsed, expected);
    }

    #[test]
    fn prop_bare_domain_gains_https(domain in domain_strategy()) {
        let normalized = normalize_https_url(&domain).unwrap();
        prop_assert_eq!(normalized, format!("https://{domain}"));
    }

    #[test]
    fn prop_http_always_rejected(domain in domain_strategy()) {
        let result = normalize_https_url(&format!("http://{domain}"));
        prop_assert!(matches!(result, Err(ConfigError::InsecureUrl(_))));
    }

    #[test]
    fn prop_well_formed_credentials_resolve(cid in "[0-9]{1,10}", hash in "[a-zA-Z0-9]{8,64}") {
        let resolver = CredentialResolver::new(
            Some(cid.clone()),
            Some(SecureValue::Plain(SecretString::new(hash.clone().into()))),
        );
        let credential = resolver.resolve().unwrap();
        prop_assert_eq!(credential.customer_id(), cid.as_str());
        prop_assert_eq!(credential.provisioning_hash().expose_secret(), hash.as_str());
    }
}
