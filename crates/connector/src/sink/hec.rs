//! Splunk HTTP Event Collector sink.

use std::sync::Arc;

use async_trait::async_trait;
use lastpass_client::{HecEvent, LastPassClient};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::{EventSink, SinkError, SinkMetadata};
use crate::normalize::CanonicalEvent;

/// Events per HEC request.
pub const DEFAULT_HEC_BATCH_SIZE: usize = 500;

/// Buffers events and posts them to HEC in batches.
///
/// A failed batch is dropped from the buffer: the tick fails, the checkpoint
/// stays put and the next tick fetches the same records again.
pub struct HecSink {
    client: Arc<LastPassClient>,
    url: String,
    token: SecretString,
    metadata: SinkMetadata,
    batch_size: usize,
    buffer: Vec<HecEvent>,
}

impl std::fmt::Debug for HecSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HecSink")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("metadata", &self.metadata)
            .field("buffered", &self.buffer.len())
            .finish()
    }
}

impl HecSink {
    pub fn new(
        client: Arc<LastPassClient>,
        url: String,
        token: SecretString,
        metadata: SinkMetadata,
    ) -> Self {
        Self {
            client,
            url,
            token,
            metadata,
            batch_size: DEFAULT_HEC_BATCH_SIZE,
            buffer: Vec::new(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    async fn send_buffer(&mut self) -> Result<(), SinkError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let batch = std::mem::take(&mut self.buffer);
        self.client
            .hec_send_batch(&self.url, self.token.expose_secret(), &batch)
            .await
            .map_err(|e| SinkError::Unavailable(format!("HEC rejected batch: {e}")))?;
        debug!(events = batch.len(), "HEC batch accepted");
        Ok(())
    }
}

#[async_trait]
impl EventSink for HecSink {
    async fn emit(&mut self, event: &CanonicalEvent) -> Result<(), SinkError> {
        self.buffer.push(self.metadata.hec_event(event)?);
        if self.buffer.len() >= self.batch_size {
            self.send_buffer().await?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        self.send_buffer().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::test_support::event;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> Arc<LastPassClient> {
        Arc::new(
            LastPassClient::builder()
                .base_url("https://lastpass.com/enterpriseapi.php".to_string())
                .max_retries(0)
                .build()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_batches_by_size_and_flushes_rest() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/collector/event"))
            .and(header("Authorization", "Splunk hec-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0, "text": "Success"})))
            .expect(2)
            .mount(&server)
            .await;

        let mut sink = HecSink::new(
            client(),
            server.uri(),
            SecretString::from("hec-token"),
            SinkMetadata::new("main"),
        )
        .with_batch_size(2);

        for action in ["a", "b", "c"] {
            sink.emit(&event(action)).await.unwrap();
        }
        sink.flush().await.unwrap();
        sink.flush().await.unwrap();
    }

    #[tokio::test]
    async fn test_rejection_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/collector/event"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"code": 4, "text": "Invalid token"})),
            )
            .mount(&server)
            .await;

        let mut sink = HecSink::new(
            client(),
            server.uri(),
            SecretString::from("wrong"),
            SinkMetadata::new("main"),
        );
        sink.emit(&event("Login")).await.unwrap();
        let err = sink.flush().await.unwrap_err();

        assert!(matches!(err, SinkError::Unavailable(_)));
        assert!(!format!("{sink:?}").contains("wrong"));
    }
}
