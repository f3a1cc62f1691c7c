//! Chat message types for lead conversations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Message identifier, unique within one conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    pub fn generate() -> Self {
        MessageId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

/// One entry of a conversation
///
/// Assistant messages start empty with `streaming` set and receive text as
/// tokens arrive; once finished their text never changes again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub streaming: bool,
}

impl ChatMessage {
    /// Complete user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            text: text.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            streaming: false,
        }
    }

    /// Complete assistant message (greetings, canned replies)
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            text: text.into(),
            sender: Sender::Assistant,
            timestamp: Utc::now(),
            streaming: false,
        }
    }

    /// Empty assistant message awaiting streamed text
    pub fn assistant_placeholder() -> Self {
        Self {
            streaming: true,
            ..Self::assistant(String::new())
        }
    }
}
