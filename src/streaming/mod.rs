//! Streaming client module
//!
//! Provides the chat completion client and the incremental SSE parser.

pub mod client;
pub mod parser;

// Re-export commonly used types
pub use client::{
    ChatBackend, ChatClient, ChatClientConfig, StreamEnd, StreamOutcome, DEFAULT_ENDPOINT,
    DEFAULT_MODEL, INTERRUPTED_NOTICE, START_FAILURE_NOTICE,
};
pub use parser::{SseStreamParser, StreamEvent, MAX_BUFFER_SIZE};
