//! Chat sessions driven by the real HTTP client against a mock endpoint

use leadpilot::chat::ChatSession;
use leadpilot::leads::LeadStore;
use leadpilot::streaming::{ChatClient, ChatClientConfig, StreamEnd, START_FAILURE_NOTICE};
use leadpilot::types::Sender;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn frame(content: &str) -> String {
    format!(
        "data: {}\n\n",
        json!({"choices": [{"delta": {"content": content}}]})
    )
}

fn client_for(server: &MockServer) -> ChatClient {
    ChatClient::new(ChatClientConfig {
        endpoint: format!("{}/api/v1/chat/completions", server.uri()),
        api_key: Some("sk-test".to_string()),
        ..Default::default()
    })
    .unwrap()
}

fn sarah() -> leadpilot::types::Lead {
    LeadStore::with_sample_leads().resolve("1").unwrap().clone()
}

#[tokio::test]
async fn test_streamed_answer_lands_in_assistant_message() {
    let server = MockServer::start().await;
    let body = format!(
        "{}{}{}data: [DONE]\n\n",
        frame("Send Sarah "),
        frame("a short "),
        frame("intro email.")
    );

    Mock::given(method("POST"))
        .and(body_string_contains("Sarah Johnson"))
        .and(body_string_contains("sarah.johnson@example.com"))
        .and(body_string_contains("How should I follow up?"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut chat = ChatSession::new(sarah());

    let mut seen = Vec::new();
    let reply = chat
        .ask_streaming(&client, "How should I follow up?", |token| {
            seen.push(token.to_string())
        })
        .await
        .unwrap();

    assert_eq!(reply.outcome.end, StreamEnd::Done);
    assert_eq!(seen.len(), 3);

    let messages = chat.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].sender, Sender::User);
    assert_eq!(messages[1].text, "How should I follow up?");

    let answer = chat.get(&reply.message_id).unwrap();
    assert_eq!(answer.sender, Sender::Assistant);
    assert_eq!(answer.text, "Send Sarah a short intro email.");
    assert!(!answer.streaming);
}

#[tokio::test]
async fn test_failed_start_is_shown_as_answer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut chat = ChatSession::new(sarah());

    let reply = chat.ask(&client, "Any tips?").await.unwrap();
    assert_eq!(reply.outcome.end, StreamEnd::FailedToStart);

    let answer = chat.get(&reply.message_id).unwrap();
    assert_eq!(answer.text, START_FAILURE_NOTICE);
    assert!(!answer.streaming);
}

#[tokio::test]
async fn test_consecutive_questions_get_separate_messages() {
    let server = MockServer::start().await;
    let body = format!("{}data: [DONE]\n", frame("ok"));

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut chat = ChatSession::new(sarah());

    let first = chat.ask(&client, "First?").await.unwrap();
    let second = chat.ask(&client, "Second?").await.unwrap();
    assert_ne!(first.message_id, second.message_id);
    assert_eq!(chat.len(), 5);

    assert!(chat.ask(&client, "   ").await.is_none());
    assert_eq!(chat.len(), 5);
}
