//! CLI cancellation utilities.
//!
//! Responsibilities:
//! - Cancel the shared [`CancellationToken`] on Ctrl+C/SIGINT.
//! - Define a single, recognizable `Cancelled` error used to signal user-initiated
//!   cancellation through `anyhow::Result`.
//! - Centralize the cancellation message.
//!
//! Does NOT handle:
//! - Deciding *when* to check for cancellation; the connector checks between
//!   pages and before committing a checkpoint.
//!
//! Invariants:
//! - A second Ctrl+C while shutting down is handled by the default signal behavior.

use std::fmt;

use lastpass_connector::{CancellationToken, ConnectorError};

/// Marker error used to indicate user-driven cancellation.
#[derive(Debug, Clone, Copy)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Returns true if this anyhow error represents a cancellation.
pub fn is_cancelled_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<Cancelled>()
            || matches!(
                cause.downcast_ref::<ConnectorError>(),
                Some(ConnectorError::Cancelled)
            )
    })
}

/// Print standard cancellation message to stderr.
pub fn print_cancelled_message() {
    eprintln!("^C\nOperation cancelled by user");
}

/// Cancel `token` on the first Ctrl+C.
pub fn install_signal_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown requested");
        token.cancel();
    });
}
