//! Validate command: check settings and credentials without collecting.

use anyhow::Result;
use lastpass_client::LastPassClient;
use lastpass_config::{Config, ConfigError, Credential, CredentialResolver, SecureValue};
use lastpass_connector::{CancellationToken, ConnectorError, SinkError};
use secrecy::ExposeSecret;
use tracing::info;

use crate::cancellation::Cancelled;

pub async fn run(config: Config, check_hec: bool, cancel: &CancellationToken) -> Result<()> {
    let credential = CredentialResolver::from_config(&config.credentials).resolve()?;

    let hec_status = if check_hec {
        let hec = config
            .output
            .hec
            .as_ref()
            .ok_or(ConfigError::MissingHecSettings)?;
        let client = LastPassClient::builder().from_config(&config).build()?;

        info!("Checking HEC health at {}", hec.url);
        let health = tokio::select! {
            res = client.hec_health_check(&hec.url, hec.token.expose_secret()) => res?,
            _ = cancel.cancelled() => return Err(Cancelled.into()),
        };
        if !health.is_healthy() {
            return Err(ConnectorError::SinkUnavailable(SinkError::Unavailable(format!(
                "HEC reported '{}' (code {})",
                health.text, health.code
            )))
            .into());
        }
        Some(format!("healthy ({})", hec.url))
    } else {
        None
    };

    print!("{}", summary(&config, &credential, hec_status.as_deref()));
    Ok(())
}

/// Human-readable settings summary. Never includes secret values.
fn summary(config: &Config, credential: &Credential, hec_status: Option<&str>) -> String {
    let hash_source = match &config.credentials.provisioning_hash {
        Some(SecureValue::Keyring { keyring_account }) => format!("keyring ({keyring_account})"),
        Some(SecureValue::Plain(_)) => "inline".to_string(),
        None => "unset".to_string(),
    };
    let inputs = config
        .collection
        .inputs
        .iter()
        .map(|i| i.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::from("Configuration OK\n");
    out.push_str(&format!("  API URL:           {}\n", config.api.base_url));
    out.push_str(&format!("  Customer ID:       {}\n", credential.customer_id()));
    out.push_str(&format!("  Provisioning hash: {hash_source}\n"));
    out.push_str(&format!("  Inputs:            {inputs}\n"));
    out.push_str(&format!(
        "  Poll interval:     {}s\n",
        config.collection.poll_interval.as_secs()
    ));
    out.push_str(&format!("  Sink:              {}\n", config.output.sink));
    out.push_str(&format!("  Index:             {}\n", config.output.index));
    out.push_str(&format!(
        "  Checkpoint dir:    {}\n",
        config.checkpoint_dir.display()
    ));
    if let Some(status) = hec_status {
        out.push_str(&format!("  HEC:               {status}\n"));
    }
    out
}
