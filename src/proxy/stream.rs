//! Re-frames the upstream SSE reply into OpenAI-style delta chunks.
//!
//! [`StreamTransducer`] is a synchronous pull-based state machine, so every
//! framing rule is testable without a runtime. [`forward`] is the thin async
//! shell that owns the upstream response and the client-facing channel.

use bytes::{Bytes, BytesMut};
use tokio::sync::mpsc;

use crate::proxy::sse;
use crate::proxy::types::openai::{ChatCompletionChunk, ChunkChoice, Delta};

/// One unit of upstream input.
#[derive(Debug)]
pub enum Pull {
    Chunk(Bytes),
    Eof,
}

/// Line-oriented SSE state machine.
///
/// Closing rules: a `data:` line under a `done`/`result` label, a `data:`
/// line without usable content, a malformed `data:` line, and end of input
/// all emit the `[DONE]` terminator and close the machine. Once closed it
/// emits nothing more, whatever is pulled through it.
pub struct StreamTransducer {
    buffer: BytesMut,
    label: Option<String>,
    closed: bool,
    chunk_id: String,
    model: String,
}

impl StreamTransducer {
    /// `model` is the caller's requested name; it is echoed into every delta
    /// chunk untouched, never the upstream-mapped one.
    pub fn new(model: &str, now_ms: i64) -> Self {
        Self {
            buffer: BytesMut::with_capacity(8192),
            label: None,
            closed: false,
            chunk_id: format!("chatcmpl-{}", now_ms),
            model: model.to_string(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Feeds one pull through the machine and returns the frames it
    /// produced, in order.
    pub fn advance(&mut self, pull: Pull, now_ms: i64) -> Vec<Bytes> {
        if self.closed {
            return Vec::new();
        }
        let mut frames = Vec::new();
        match pull {
            Pull::Chunk(chunk) => {
                self.buffer.extend_from_slice(&chunk);
                while let Some(pos) = memchr::memchr(b'\n', &self.buffer) {
                    let line = self.buffer.split_to(pos + 1);
                    let line = String::from_utf8_lossy(&line[..line.len() - 1]);
                    if self.handle_line(line.trim_end_matches('\r'), now_ms, &mut frames) {
                        self.closed = true;
                        return frames;
                    }
                }
            }
            Pull::Eof => {
                // A partial line left in the buffer is never processed.
                self.buffer.clear();
                frames.push(sse::done_frame());
                self.closed = true;
            }
        }
        frames
    }

    /// Returns true when the line ended the stream.
    fn handle_line(&mut self, line: &str, now_ms: i64, frames: &mut Vec<Bytes>) -> bool {
        if let Some(label) = line.strip_prefix("event: ") {
            self.label = Some(label.trim().to_string());
            return false;
        }
        let Some(payload) = line.strip_prefix("data: ") else {
            // Blank lines, comments and unknown fields carry nothing.
            return false;
        };

        if matches!(self.label.as_deref(), Some("done") | Some("result")) {
            frames.push(sse::done_frame());
            return true;
        }

        match serde_json::from_str::<serde_json::Value>(payload) {
            Ok(record) => {
                let content = record.get("content").and_then(|v| v.as_str()).unwrap_or("");
                if content.is_empty() {
                    // No content means the upstream is done talking.
                    frames.push(sse::done_frame());
                    return true;
                }
                frames.push(self.delta_frame(content, now_ms));
                self.label = None;
                false
            }
            Err(_) => {
                // A record we cannot decode ends the turn instead of erroring.
                frames.push(sse::done_frame());
                true
            }
        }
    }

    fn delta_frame(&self, content: &str, now_ms: i64) -> Bytes {
        let chunk = ChatCompletionChunk {
            id: self.chunk_id.clone(),
            object: "chat.completion.chunk".to_string(),
            created: now_ms / 1000,
            model: self.model.clone(),
            choices: vec![ChunkChoice {
                index: 0,
                delta: Delta {
                    content: Some(content.to_string()),
                },
                finish_reason: None,
            }],
        };
        let payload = serde_json::to_string(&chunk).unwrap_or_default();
        sse::Event::default().data(payload).into_bytes()
    }
}

/// Drives one upstream response through a transducer, forwarding frames to
/// a bounded channel the HTTP body reads from.
///
/// Returning from the task drops the upstream response, which cancels the
/// transfer. That is the required behavior both when the transducer closes
/// and when the client goes away. A read error is forwarded as an error
/// without `[DONE]`, so the client observes an aborted stream rather than a
/// clean end.
pub fn forward(
    mut upstream: reqwest::Response,
    mut transducer: StreamTransducer,
) -> mpsc::Receiver<Result<Bytes, String>> {
    let (tx, rx) = mpsc::channel::<Result<Bytes, String>>(32);
    tokio::spawn(async move {
        loop {
            let pull = match upstream.chunk().await {
                Ok(Some(chunk)) => Pull::Chunk(chunk),
                Ok(None) => Pull::Eof,
                Err(e) => {
                    log::warn!("upstream stream read failed: {}", e);
                    let _ = tx.send(Err(e.to_string())).await;
                    return;
                }
            };
            let at_eof = matches!(pull, Pull::Eof);
            let now_ms = chrono::Utc::now().timestamp_millis();
            for frame in transducer.advance(pull, now_ms) {
                if tx.send(Ok(frame)).await.is_err() {
                    // Client went away.
                    return;
                }
            }
            if transducer.is_closed() || at_eof {
                return;
            }
        }
    });
    rx
}
