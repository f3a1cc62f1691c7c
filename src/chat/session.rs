//! Conversation about a single lead
//!
//! Messages keep insertion order in a vector; an id → position index gives
//! direct access to the assistant message being streamed into.

use crate::chat::prompt::{build_lead_prompt, greeting};
use crate::errors::{LeadError, Result};
use crate::streaming::{ChatBackend, StreamOutcome};
use crate::types::{ChatMessage, Lead, MessageId};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Result of one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Assistant message holding the answer
    pub message_id: MessageId,
    pub outcome: StreamOutcome,
}

/// Ordered message list for one lead
#[derive(Debug)]
pub struct ChatSession {
    lead: Lead,
    messages: Vec<ChatMessage>,
    index: HashMap<MessageId, usize>,
}

impl ChatSession {
    /// Open a conversation with the assistant greeting
    pub fn new(lead: Lead) -> Self {
        let mut session = Self {
            messages: Vec::new(),
            index: HashMap::new(),
            lead,
        };
        let opening = ChatMessage::assistant(greeting(&session.lead));
        session.push(opening);
        session
    }

    fn push(&mut self, message: ChatMessage) -> MessageId {
        let id = message.id.clone();
        self.index.insert(id.clone(), self.messages.len());
        self.messages.push(message);
        id
    }

    /// Append a complete user message
    pub fn push_user(&mut self, text: impl Into<String>) -> MessageId {
        self.push(ChatMessage::user(text))
    }

    /// Append an empty assistant message that accepts streamed text
    pub fn begin_assistant(&mut self) -> MessageId {
        self.push(ChatMessage::assistant_placeholder())
    }

    fn message_mut(&mut self, id: &MessageId) -> Result<&mut ChatMessage> {
        let position = *self
            .index
            .get(id)
            .ok_or_else(|| LeadError::MessageNotFound(id.to_string()))?;
        Ok(&mut self.messages[position])
    }

    /// Replace the text of a streaming message
    pub fn set_text(&mut self, id: &MessageId, text: &str) -> Result<()> {
        let message = self.message_mut(id)?;
        if !message.streaming {
            return Err(LeadError::MessageFinalized(id.to_string()));
        }
        message.text.clear();
        message.text.push_str(text);
        Ok(())
    }

    /// Freeze a streaming message
    pub fn finish(&mut self, id: &MessageId) -> Result<()> {
        self.message_mut(id)?.streaming = false;
        Ok(())
    }

    /// Ask about the lead and stream the answer into a new assistant message
    ///
    /// Returns `None` for a blank question, which leaves the session untouched.
    pub async fn ask<B>(&mut self, backend: &B, question: &str) -> Option<ChatReply>
    where
        B: ChatBackend + ?Sized,
    {
        self.ask_streaming(backend, question, |_| {}).await
    }

    /// Like [`ask`](Self::ask), also passing every fragment to `observer`
    pub async fn ask_streaming<B, F>(
        &mut self,
        backend: &B,
        question: &str,
        mut observer: F,
    ) -> Option<ChatReply>
    where
        B: ChatBackend + ?Sized,
        F: FnMut(&str) + Send,
    {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        self.push_user(question);
        let prompt = build_lead_prompt(&self.lead, question);
        let reply_id = self.begin_assistant();

        let mut streamed = String::new();
        let outcome = {
            let mut on_delta = |token: &str| {
                streamed.push_str(token);
                observer(token);
                if let Err(e) = self.set_text(&reply_id, &streamed) {
                    warn!(error = %e, "dropped streamed text");
                }
            };
            backend.stream_reply(&prompt, &mut on_delta).await
        };

        if let Err(e) = self.finish(&reply_id) {
            warn!(error = %e, "could not finalize reply");
        }
        debug!(lead = %self.lead.id, tokens = outcome.tokens, end = ?outcome.end, "reply finished");

        Some(ChatReply {
            message_id: reply_id,
            outcome,
        })
    }

    pub fn lead(&self) -> &Lead {
        &self.lead
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn get(&self, id: &MessageId) -> Option<&ChatMessage> {
        self.index.get(id).map(|&position| &self.messages[position])
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::LeadStore;
    use crate::streaming::StreamEnd;
    use crate::types::Sender;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend replaying fixed tokens and remembering the prompt
    struct ScriptedBackend {
        tokens: Vec<&'static str>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(tokens: Vec<&'static str>) -> Self {
            Self {
                tokens,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn stream_reply(
            &self,
            prompt: &str,
            on_delta: &mut (dyn for<'t> FnMut(&'t str) + Send),
        ) -> StreamOutcome {
            self.prompts.lock().unwrap().push(prompt.to_string());
            for token in &self.tokens {
                on_delta(token);
            }
            StreamOutcome {
                end: StreamEnd::Done,
                tokens: self.tokens.len(),
            }
        }
    }

    fn session() -> ChatSession {
        let store = LeadStore::with_sample_leads();
        ChatSession::new(store.all()[0].clone())
    }

    #[test]
    fn test_session_opens_with_greeting() {
        let session = session();
        assert_eq!(session.len(), 1);
        assert_eq!(session.messages()[0].sender, Sender::Assistant);
        assert!(session.messages()[0].text.contains("Sarah Johnson"));
    }

    #[tokio::test]
    async fn test_ask_streams_into_assistant_message() {
        let mut session = session();
        let backend = ScriptedBackend::new(vec!["Call ", "her ", "tomorrow."]);

        let reply = session.ask(&backend, "When should I call?").await.unwrap();

        assert_eq!(reply.outcome.end, StreamEnd::Done);
        assert_eq!(session.len(), 3);
        assert_eq!(session.messages()[1].sender, Sender::User);
        assert_eq!(session.messages()[1].text, "When should I call?");

        let answer = session.get(&reply.message_id).unwrap();
        assert_eq!(answer.sender, Sender::Assistant);
        assert_eq!(answer.text, "Call her tomorrow.");
        assert!(!answer.streaming);

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("- Name: Sarah Johnson"));
        assert!(prompts[0].contains("When should I call?"));
    }

    #[tokio::test]
    async fn test_observer_sees_each_token() {
        let mut session = session();
        let backend = ScriptedBackend::new(vec!["a", "b"]);
        let mut seen = Vec::new();

        session
            .ask_streaming(&backend, "hi", |t| seen.push(t.to_string()))
            .await
            .unwrap();

        assert_eq!(seen, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_blank_question_ignored() {
        let mut session = session();
        let backend = ScriptedBackend::new(vec!["x"]);

        assert!(session.ask(&backend, "   ").await.is_none());
        assert_eq!(session.len(), 1);
        assert!(backend.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_finalized_message_rejects_text() {
        let mut session = session();
        let id = session.begin_assistant();

        session.set_text(&id, "partial").unwrap();
        session.finish(&id).unwrap();

        assert!(matches!(
            session.set_text(&id, "changed").unwrap_err(),
            LeadError::MessageFinalized(_)
        ));
        assert_eq!(session.get(&id).unwrap().text, "partial");
    }

    #[test]
    fn test_user_message_is_not_streaming() {
        let mut session = session();
        let id = session.push_user("hello");
        assert!(session.set_text(&id, "edit").is_err());
    }

    #[test]
    fn test_unknown_message() {
        let mut session = session();
        let stranger = ChatMessage::user("x").id;
        assert!(matches!(
            session.set_text(&stranger, "y").unwrap_err(),
            LeadError::MessageNotFound(_)
        ));
    }
}
