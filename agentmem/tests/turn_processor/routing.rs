//! Tool-call filtering and routing through process_turn.

use agentmem::{LlmChunk, Message, MockTurn, ToolCall, ToolCallDelta, TurnDecision};
use serde_json::json;

use crate::common::{Harness, USER};

/// **Scenario**: An empty-name call next to a named one leaves only the named call,
/// and a tool without authorization routes to RunTools.
#[tokio::test]
async fn empty_name_call_is_dropped() {
    let h = Harness::new(
        vec![MockTurn::from_chunks(vec![LlmChunk::tool_calls(vec![
            ToolCallDelta::complete("", json!({})),
            ToolCallDelta::complete("send_email", json!({"to": "bob@example.com"})),
        ])])],
        &["list_emails"],
    );
    let outcome = h
        .processor()
        .process_turn(&[Message::user("email bob")], USER)
        .await
        .unwrap();
    let calls = outcome.message.tool_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name, "send_email");
    assert_eq!(outcome.next, TurnDecision::RunTools);
}

/// **Scenario**: A reply without tool calls ends the turn.
#[tokio::test]
async fn no_tool_calls_ends() {
    let h = Harness::new(vec![MockTurn::text("Hello!")], &["list_emails"]);
    let outcome = h
        .processor()
        .process_turn(&[Message::user("hi")], USER)
        .await
        .unwrap();
    assert_eq!(outcome.next, TurnDecision::End);
    assert_eq!(outcome.message, Message::assistant("Hello!"));
}

/// **Scenario**: Only a call consisting of whitespace yields no calls and ends the turn.
#[tokio::test]
async fn whitespace_only_call_ends() {
    let h = Harness::new(
        vec![MockTurn::with_tool_calls(
            "thinking",
            vec![ToolCall::new("  ", json!({}))],
        )],
        &[],
    );
    let outcome = h
        .processor()
        .process_turn(&[Message::user("hi")], USER)
        .await
        .unwrap();
    assert!(outcome.message.tool_calls().is_empty());
    assert_eq!(outcome.next, TurnDecision::End);
}
