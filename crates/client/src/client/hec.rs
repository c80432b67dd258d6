//! HEC methods for [`LastPassClient`].
//!
//! HEC uses its own URL and token; these methods take them as parameters and
//! reuse only the client's HTTP stack, retry budget and metrics.

use crate::client::LastPassClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::hec::{HecEvent, HecHealth, HecResponse};

impl LastPassClient {
    /// Send a batch of events via HEC.
    pub async fn hec_send_batch(
        &self,
        hec_url: &str,
        hec_token: &str,
        events: &[HecEvent],
    ) -> Result<HecResponse> {
        endpoints::hec::send_batch(
            &self.http,
            hec_url,
            hec_token,
            events,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Check HEC health.
    pub async fn hec_health_check(&self, hec_url: &str, hec_token: &str) -> Result<HecHealth> {
        endpoints::hec::health_check(
            &self.http,
            hec_url,
            hec_token,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }
}
