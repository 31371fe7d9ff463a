//! Sink output during streaming.

use std::sync::Arc;
use std::time::Duration;

use agentmem::{
    BufferSink, ChatFormatter, InMemoryStore, LlmChunk, Message, MockLlm, MockTurn,
    StaticCapabilityRegistry, ToolCall, TurnError, TurnProcessor,
};
use serde_json::json;

use crate::common::{Harness, USER};

/// **Scenario**: Chunks reach the sink one write each, in arrival order.
#[tokio::test]
async fn chunks_written_in_order() {
    let h = Harness::new(
        vec![MockTurn::from_chunks(vec![
            LlmChunk::text("You "),
            LlmChunk::text("have "),
            LlmChunk::text("3 emails."),
        ])],
        &[],
    );
    let outcome = h
        .processor()
        .process_turn(&[Message::user("emails?")], USER)
        .await
        .unwrap();
    assert_eq!(h.sink.writes(), vec!["You ", "have ", "3 emails."]);
    assert_eq!(outcome.message.content(), "You have 3 emails.");
}

/// **Scenario**: A stream that fails midway keeps the emitted text and reports a model error.
#[tokio::test]
async fn stream_failure_keeps_emitted_text() {
    let h = Harness::new(
        vec![MockTurn::failing_after(
            vec![LlmChunk::text("Partial "), LlmChunk::text("answer")],
            "connection reset",
        )],
        &[],
    );
    let err = h
        .processor()
        .process_turn(&[Message::user("hi")], USER)
        .await
        .unwrap_err();
    assert!(matches!(err, TurnError::Model(_)));
    assert_eq!(h.sink.contents(), "Partial answer");
}

/// **Scenario**: Through a ChatFormatter, notices after streamed text get the chat layout.
#[tokio::test]
async fn chat_formatter_spaces_notices() {
    let formatter = Arc::new(ChatFormatter::new(BufferSink::new()));
    let p = TurnProcessor::new(
        Arc::new(MockLlm::with_turns(vec![MockTurn::with_tool_calls(
            "Let me check",
            vec![ToolCall::new("list_emails", json!({}))],
        )])),
        Arc::new(InMemoryStore::new()),
        Arc::new(StaticCapabilityRegistry::new(["list_emails"]).with_url_base("https://a.test")),
        formatter.clone(),
    )
    .with_auth_timeout(Duration::from_millis(10));
    let _ = p.process_turn(&[Message::user("emails")], USER).await;
    let content = formatter.content();
    assert!(content.starts_with("Let me check\n\n🔐 Authorization required for list_emails\n\n"));
    assert!(content.ends_with("Waiting for authorization...\n\n\n\n"));
}
