//! Memory recall and storage through process_turn.

use std::sync::Arc;

use agentmem::{
    memory_namespace, BufferSink, Message, MockLlm, MockTurn, StaticCapabilityRegistry, Store,
    TurnDecision, TurnError, TurnProcessor,
};
use serde_json::json;

use crate::common::{FailingStore, Harness, USER};

/// **Scenario**: "Remember to buy milk" stores exactly one record holding the message text.
#[tokio::test]
async fn remember_message_stores_one_record() {
    let h = Harness::new(vec![MockTurn::text("Got it.")], &[]);
    let outcome = h
        .processor()
        .process_turn(&[Message::user("Remember to buy milk")], USER)
        .await
        .unwrap();
    assert_eq!(outcome.next, TurnDecision::End);

    let ns = memory_namespace(USER);
    let keys = h.store.list(&ns).await.unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(outcome.stored_memory.as_deref(), Some(keys[0].as_str()));
    assert_eq!(
        h.store.get(&ns, &keys[0]).await.unwrap(),
        Some(json!({"data": "Remember to buy milk", "tag": "user_message"}))
    );
}

/// **Scenario**: "I need milk" stores nothing.
#[tokio::test]
async fn plain_message_stores_nothing() {
    let h = Harness::new(vec![MockTurn::text("Ok.")], &[]);
    let outcome = h
        .processor()
        .process_turn(&[Message::user("I need milk")], USER)
        .await
        .unwrap();
    assert!(outcome.stored_memory.is_none());
    assert!(h.store.list(&memory_namespace(USER)).await.unwrap().is_empty());
}

/// **Scenario**: A memory stored in one turn is recalled into the next turn's system prompt.
#[tokio::test]
async fn stored_memory_is_recalled_next_turn() {
    let h = Harness::new(vec![MockTurn::text("Got it."), MockTurn::text("Milk.")], &[]);
    let p = h.processor();
    let mut history = vec![Message::user("Remember to buy milk")];
    let first = p.process_turn(&history, USER).await.unwrap();
    history.push(first.message);
    history.push(Message::user("What milk do I need?"));
    p.process_turn(&history, USER).await.unwrap();

    let prompts = h.llm.received();
    assert_eq!(prompts[0][0].content(), "You are a helpful AI assistant.");
    assert_eq!(
        prompts[1][0].content(),
        "You are a helpful AI assistant. User memories:\n- Remember to buy milk"
    );
    assert_eq!(prompts[1].iter().filter(|m| m.is_system()).count(), 1);
}

/// **Scenario**: Ids differing only by a dot keep separate memories.
#[tokio::test]
async fn user_namespaces_do_not_collide() {
    let h = Harness::new(vec![MockTurn::text("ok")], &[]);
    let p = h.processor();
    p.process_turn(&[Message::user("remember: tea")], "a.b")
        .await
        .unwrap();
    p.process_turn(&[Message::user("tea?")], "ab").await.unwrap();
    let prompts = h.llm.received();
    assert_eq!(prompts[1][0].content(), "You are a helpful AI assistant.");
}

/// **Scenario**: A failing store aborts the turn before the model is called or anything is written.
#[tokio::test]
async fn store_failure_aborts_turn() {
    let llm = Arc::new(MockLlm::with_no_tool_calls("never"));
    let sink = Arc::new(BufferSink::new());
    let p = TurnProcessor::new(
        llm.clone(),
        Arc::new(FailingStore),
        Arc::new(StaticCapabilityRegistry::new(Vec::<String>::new())),
        sink.clone(),
    );
    let err = p
        .process_turn(&[Message::user("Remember to buy milk")], USER)
        .await
        .unwrap_err();
    assert!(matches!(err, TurnError::Store(_)));
    assert!(llm.received().is_empty());
    assert!(sink.contents().is_empty());
}
