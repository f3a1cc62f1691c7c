//! LeadPilot - Terminal lead manager with a streaming AI assistant
//!
//! Leads are kept in memory for the session. For any lead you can open a chat
//! and ask how to follow up; answers stream in from an OpenAI-compatible
//! chat completion endpoint.
//!
//! # Architecture
//!
//! - **streaming**: chat completion client + incremental SSE parser
//! - **leads**: in-memory working set + document intake
//! - **chat**: per-lead conversation and prompt building
//! - **repl / cli**: terminal surface, arguments and configuration

pub mod errors;
pub mod types;
pub mod streaming;

// Re-export commonly used types
pub use errors::{LeadError, Result};

pub mod leads;
pub mod chat;

// Terminal surface
pub mod cli;
pub mod repl;
pub mod telemetry;
