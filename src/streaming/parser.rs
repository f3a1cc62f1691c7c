//! Incremental parser for server-sent chat completion streams
//!
//! Turns raw body chunks into text deltas:
//! - UTF-8 decoding that tolerates characters split across chunks
//! - Line buffering with the unterminated tail kept for the next chunk
//! - `data: ` framing, `[DONE]` sentinel, per-frame JSON payloads
//!
//! ```text
//! feed(chunk):
//!   text   ← utf8_decode(pending ++ chunk)      // incomplete tail stays pending
//!   buffer ← buffer ++ text
//!   lines, buffer ← split_last(buffer, '\n')
//!   for line in lines:
//!     skip unless line starts with "data:"
//!     payload ← trim(strip_prefix(line, "data: "))
//!     payload = "[DONE]"  → emit Done, stop
//!     json(payload) fails → warn, skip line
//!     choices[0].delta.content non-empty → emit Delta
//! ```

use crate::errors::{LeadError, Result};
use serde_json::Value;
use tracing::{debug, warn};

/// Maximum size of an unterminated line (1MB)
pub const MAX_BUFFER_SIZE: usize = 1_048_576;

/// Sentinel payload that ends a stream
pub const DONE_SENTINEL: &str = "[DONE]";

const DATA_FIELD: &str = "data:";
const DATA_PREFIX: &str = "data: ";

/// Event produced from a completed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental text fragment
    Delta(String),

    /// The `[DONE]` sentinel was seen
    Done,
}

/// Parser states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    /// Accepting chunks
    Streaming,

    /// Sentinel seen, all further input is ignored
    Done,
}

/// Outcome of interpreting a single line
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineOutcome {
    Delta(String),
    Done,
    Skip,
    Malformed,
}

/// Streaming UTF-8 decoder
///
/// Holds back an incomplete multi-byte sequence at the end of a chunk until
/// the rest of it arrives. Invalid sequences become U+FFFD.
#[derive(Debug, Default)]
struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::with_capacity(self.pending.len());

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));

                    match e.error_len() {
                        Some(invalid) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + invalid);
                        }
                        None => {
                            // Truncated sequence: wait for the next chunk
                            self.pending.drain(..valid);
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Incremental SSE parser for chat completion streams
#[derive(Debug)]
pub struct SseStreamParser {
    /// Decoder for raw body bytes
    decoder: Utf8Decoder,

    /// Unterminated trailing line
    buffer: String,

    /// Current parser state
    state: ParserState,

    /// Maximum size of the unterminated line
    max_buffer_size: usize,

    /// Frames skipped because their payload was not JSON
    malformed_frames: usize,
}

impl SseStreamParser {
    /// Create new parser with default settings
    pub fn new() -> Self {
        Self::with_capacity(MAX_BUFFER_SIZE)
    }

    /// Create parser with custom line size limit
    pub fn with_capacity(max_buffer_size: usize) -> Self {
        Self {
            decoder: Utf8Decoder::default(),
            buffer: String::with_capacity(4096),
            state: ParserState::Streaming,
            max_buffer_size,
            malformed_frames: 0,
        }
    }

    /// Push one body chunk and collect the events of every line it completes
    ///
    /// Events keep arrival order. Once `Done` is returned the parser is
    /// finished: lines after the sentinel are dropped and later chunks
    /// produce nothing.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<StreamEvent>> {
        let mut events = Vec::new();
        if self.state == ParserState::Done {
            return Ok(events);
        }

        let text = self.decoder.decode(bytes);
        self.buffer.push_str(&text);

        if let Some(last_newline) = self.buffer.rfind('\n') {
            let complete: String = self.buffer.drain(..=last_newline).collect();

            for line in complete.split('\n') {
                match Self::interpret_line(line) {
                    LineOutcome::Delta(token) => events.push(StreamEvent::Delta(token)),
                    LineOutcome::Done => {
                        debug!("stream sentinel received");
                        self.state = ParserState::Done;
                        self.buffer.clear();
                        events.push(StreamEvent::Done);
                        return Ok(events);
                    }
                    LineOutcome::Malformed => self.malformed_frames += 1,
                    LineOutcome::Skip => {}
                }
            }
        }

        if self.buffer.len() > self.max_buffer_size {
            return Err(LeadError::StreamingError(format!(
                "Buffer overflow: unterminated line of {} bytes exceeds maximum {}",
                self.buffer.len(),
                self.max_buffer_size
            )));
        }

        Ok(events)
    }

    /// Interpret one complete line (without its `\n`)
    fn interpret_line(line: &str) -> LineOutcome {
        if !line.starts_with(DATA_FIELD) {
            return LineOutcome::Skip;
        }

        let payload = line.strip_prefix(DATA_PREFIX).unwrap_or(line).trim();

        if payload == DONE_SENTINEL {
            return LineOutcome::Done;
        }

        let frame: Value = match serde_json::from_str(payload) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(payload = %payload, error = %e, "stream parse error, skipping frame");
                return LineOutcome::Malformed;
            }
        };

        match extract_delta(&frame) {
            Some(token) => LineOutcome::Delta(token.to_string()),
            None => LineOutcome::Skip,
        }
    }

    /// Whether the sentinel has been seen
    pub fn is_done(&self) -> bool {
        self.state == ParserState::Done
    }

    /// Bytes held back: unterminated line plus undecoded tail
    pub fn buffered_len(&self) -> usize {
        self.buffer.len() + self.decoder.pending_len()
    }

    /// Frames skipped because their payload was not valid JSON
    pub fn malformed_frames(&self) -> usize {
        self.malformed_frames
    }
}

impl Default for SseStreamParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-empty text at `choices[0].delta.content`
pub fn extract_delta(frame: &Value) -> Option<&str> {
    frame
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()
        .filter(|content| !content.is_empty())
}
