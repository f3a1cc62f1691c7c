//! Lead conversations with the streaming assistant

pub mod prompt;
pub mod session;

pub use prompt::{build_lead_prompt, greeting};
pub use session::{ChatReply, ChatSession};
