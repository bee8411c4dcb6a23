//! Minimal server-sent-event formatting for the client-facing stream.

use std::fmt;

use bytes::Bytes;

/// Marker payload that ends an OpenAI-style SSE stream.
pub const DONE_MARKER: &str = "[DONE]";

/// One server-sent event, rendered in wire order: the `event:` line when
/// present, then `data:`, then the blank separator line.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Event {
    event: Option<String>,
    data: Option<String>,
}

impl Event {
    pub fn event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.to_string())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(event) = &self.event {
            writeln!(f, "event: {}", event)?;
        }
        if let Some(data) = &self.data {
            writeln!(f, "data: {}", data)?;
        }
        writeln!(f)
    }
}

/// The `data: [DONE]` terminator frame.
pub fn done_frame() -> Bytes {
    Event::default().data(DONE_MARKER).into_bytes()
}
