//! Splunk modular-input XML stream.
//!
//! Output shape:
//! `<stream><event><time/><source/><sourcetype/><index/>[<host/>]<data/></event>...</stream>`

use std::io::Write;

use async_trait::async_trait;

use super::{EventSink, SinkError, SinkMetadata, source, sourcetype};
use crate::normalize::CanonicalEvent;

/// Writes events as modular-input XML.
///
/// `<stream>` is opened by the first event and closed by [`EventSink::close`].
#[derive(Debug)]
pub struct StreamSink<W: Write + Send> {
    writer: W,
    metadata: SinkMetadata,
    opened: bool,
}

impl<W: Write + Send> StreamSink<W> {
    pub fn new(writer: W, metadata: SinkMetadata) -> Self {
        Self {
            writer,
            metadata,
            opened: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: Write + Send> EventSink for StreamSink<W> {
    async fn emit(&mut self, event: &CanonicalEvent) -> Result<(), SinkError> {
        let data = serde_json::to_string(event)?;
        let time = format!(
            "{}.{:03}",
            event.timestamp.timestamp(),
            event.timestamp.timestamp_subsec_millis()
        );

        let mut xml = String::with_capacity(data.len() + 256);
        if !self.opened {
            xml.push_str("<stream>");
        }
        xml.push_str("<event>");
        push_element(&mut xml, "time", &time);
        push_element(&mut xml, "source", &source(event.input_type));
        push_element(&mut xml, "sourcetype", sourcetype(event.input_type));
        push_element(&mut xml, "index", &self.metadata.index);
        if let Some(host) = &self.metadata.host {
            push_element(&mut xml, "host", host);
        }
        push_element(&mut xml, "data", &data);
        xml.push_str("</event>\n");

        self.writer.write_all(xml.as_bytes())?;
        self.opened = true;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        if self.opened {
            self.writer.write_all(b"</stream>\n")?;
            self.opened = false;
        }
        self.flush().await
    }
}

fn push_element(out: &mut String, name: &str, text: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}
