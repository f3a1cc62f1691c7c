//! Type definitions module
//!
//! Lead records and chat messages shared across the crate.

pub mod chat;
pub mod lead;

// Re-export commonly used types
pub use chat::{ChatMessage, MessageId, Sender};
pub use lead::{Lead, LeadId, LeadSource, LeadStatus, LeadUpdate, NewLead};
