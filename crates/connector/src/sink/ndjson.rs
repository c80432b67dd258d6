//! Newline-delimited JSON output, one HEC envelope per line.

use std::io::Write;

use async_trait::async_trait;

use super::{EventSink, SinkError, SinkMetadata};
use crate::normalize::CanonicalEvent;

#[derive(Debug)]
pub struct NdjsonSink<W: Write + Send> {
    writer: W,
    metadata: SinkMetadata,
}

impl<W: Write + Send> NdjsonSink<W> {
    pub fn new(writer: W, metadata: SinkMetadata) -> Self {
        Self { writer, metadata }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: Write + Send> EventSink for NdjsonSink<W> {
    async fn emit(&mut self, event: &CanonicalEvent) -> Result<(), SinkError> {
        let hec = self.metadata.hec_event(event)?;
        serde_json::to_writer(&mut self.writer, &hec)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::test_support::event;

    #[tokio::test]
    async fn test_one_line_per_event() {
        let mut sink = NdjsonSink::new(Vec::new(), SinkMetadata::new("main"));
        sink.emit(&event("Login")).await.unwrap();
        sink.emit(&event("Log off")).await.unwrap();
        sink.flush().await.unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["event"]["action"], "Log off");
        assert_eq!(lines[0]["sourcetype"], "lastpass:activity");
    }
}
