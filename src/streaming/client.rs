//! Streaming chat completion client
//!
//! One POST per question against an OpenAI-compatible endpoint
//! (OpenRouter by default) with `stream: true`. The body is fed chunk by
//! chunk through [`SseStreamParser`] and every text delta is handed to the
//! caller's callback in arrival order.
//!
//! Failures never reach the caller as errors: they are logged and show up as
//! a single warning token in the callback.

use crate::errors::{LeadError, Result};
use crate::streaming::parser::{SseStreamParser, StreamEvent};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use serde::Serialize;
use std::fmt;
use tracing::{debug, error, info};

/// Default chat completion endpoint
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default `HTTP-Referer` identification header
pub const DEFAULT_REFERER: &str = "http://localhost";

/// Default `X-Title` identification header
pub const DEFAULT_TITLE: &str = "AI Lead Assistant";

/// Fixed system instruction sent with every request
pub const SYSTEM_PROMPT: &str =
    "You are an AI assistant for lead management. Answer clearly and helpfully.";

/// Token delivered when the request cannot be started
pub const START_FAILURE_NOTICE: &str = "⚠️ Stream failed to start.";

/// Token delivered when the body stream breaks off
pub const INTERRUPTED_NOTICE: &str = "⚠️ Stream interrupted.";

/// How a stream ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// `[DONE]` sentinel received
    Done,

    /// Body ended without a sentinel
    Exhausted,

    /// Transport error or non-success status before any reading
    FailedToStart,

    /// Error while reading the body
    Interrupted,
}

/// Summary returned once a stream is over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOutcome {
    pub end: StreamEnd,

    /// Text deltas delivered, warning tokens excluded
    pub tokens: usize,
}

impl StreamOutcome {
    /// Whether the stream ended without a failure
    pub fn is_success(&self) -> bool {
        matches!(self.end, StreamEnd::Done | StreamEnd::Exhausted)
    }
}

/// Anything that can stream an assistant reply for a prompt
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Stream the reply to `prompt`, calling `on_delta` once per fragment
    async fn stream_reply(
        &self,
        prompt: &str,
        on_delta: &mut (dyn for<'t> FnMut(&'t str) + Send),
    ) -> StreamOutcome;
}

/// Connection settings for [`ChatClient`]
#[derive(Clone)]
pub struct ChatClientConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub referer: String,
    pub title: String,
}

impl Default for ChatClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl fmt::Debug for ChatClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClientConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("referer", &self.referer)
            .field("title", &self.title)
            .finish()
    }
}

/// Chat completion request body
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub stream: bool,
    pub messages: Vec<RequestMessage>,
    pub temperature: f64,
}

/// One message of the request body
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RequestMessage {
    pub role: String,
    pub content: String,
}

impl RequestMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

/// Streaming chat completion client
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    config: ChatClientConfig,
    api_key: String,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Create client; an API key is required
    pub fn new(config: ChatClientConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LeadError::ConfigError(
                    "No API key configured: set OPENROUTER_API_KEY or openrouter.api_key"
                        .to_string(),
                )
            })?;

        let client = Client::builder().build().map_err(LeadError::HttpError)?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Build the request body for a prompt
    pub fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            stream: true,
            messages: vec![
                RequestMessage::new("system", SYSTEM_PROMPT),
                RequestMessage::new("user", prompt),
            ],
            temperature: self.config.temperature,
        }
    }

    /// Stream the reply to `prompt` into `on_delta`
    ///
    /// Resolves once the stream is over, whichever way it ended. Deltas arrive
    /// in server order; on failure exactly one warning token is delivered.
    pub async fn stream_chat<F>(&self, prompt: &str, mut on_delta: F) -> StreamOutcome
    where
        F: FnMut(&str),
    {
        let response = match self.start(prompt).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "chat stream failed to start");
                on_delta(START_FAILURE_NOTICE);
                return StreamOutcome {
                    end: StreamEnd::FailedToStart,
                    tokens: 0,
                };
            }
        };

        let mut parser = SseStreamParser::new();
        let mut body = response.bytes_stream();
        let mut tokens = 0;

        while let Some(chunk) = body.next().await {
            let events = match chunk
                .map_err(|e| LeadError::StreamingError(e.to_string()))
                .and_then(|bytes: Bytes| parser.feed(&bytes))
            {
                Ok(events) => events,
                Err(e) => {
                    error!(error = %e, tokens, "chat stream interrupted");
                    on_delta(INTERRUPTED_NOTICE);
                    return StreamOutcome {
                        end: StreamEnd::Interrupted,
                        tokens,
                    };
                }
            };

            for event in events {
                match event {
                    StreamEvent::Delta(token) => {
                        tokens += 1;
                        on_delta(&token);
                    }
                    StreamEvent::Done => {
                        info!(tokens, "chat stream complete");
                        return StreamOutcome {
                            end: StreamEnd::Done,
                            tokens,
                        };
                    }
                }
            }
        }

        debug!(
            tokens,
            discarded = parser.buffered_len(),
            "chat stream ended without sentinel"
        );
        StreamOutcome {
            end: StreamEnd::Exhausted,
            tokens,
        }
    }

    /// Send the request and check the status
    async fn start(&self, prompt: &str) -> Result<Response> {
        let request = self.build_request(prompt);
        debug!(endpoint = %self.config.endpoint, model = %request.model, "sending chat request");

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&request)
            .send()
            .await
            .map_err(|e| LeadError::StreamingError(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LeadError::StreamingError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        Ok(response)
    }

    /// Get current model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn stream_reply(
        &self,
        prompt: &str,
        on_delta: &mut (dyn for<'t> FnMut(&'t str) + Send),
    ) -> StreamOutcome {
        self.stream_chat(prompt, |token| on_delta(token)).await
    }
}
