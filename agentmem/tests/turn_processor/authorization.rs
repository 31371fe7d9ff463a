//! Authorization paths: already granted, granted while waiting, rejected, timed out, cancelled.

use std::sync::Arc;
use std::time::Duration;

use agentmem::{
    memory_namespace, AgentRunner, Message, MockToolSource, MockTurn, RunError, Store, ToolCall,
    TurnDecision, TurnError,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::common::{Harness, AUTH_URL_BASE, USER};

fn list_emails_turn() -> MockTurn {
    MockTurn::with_tool_calls(
        "",
        vec![ToolCall::new("list_emails", json!({"limit": 5})).with_id("call_1")],
    )
}

/// **Scenario**: With authorization already completed the turn reaches RunTools, stores the
/// memory, and writes no notice.
#[tokio::test]
async fn completed_authorization_runs_tools() {
    let h = Harness::new(vec![list_emails_turn()], &["list_emails"]);
    h.registry.grant(USER, "list_emails");
    let outcome = h
        .processor()
        .process_turn(
            &[Message::user("What emails do I have today? Remember my question too")],
            USER,
        )
        .await
        .unwrap();
    assert_eq!(outcome.next, TurnDecision::RunTools);
    assert!(outcome.stored_memory.is_some());
    assert_eq!(h.store.list(&memory_namespace(USER)).await.unwrap().len(), 1);
    assert!(h.sink.contents().is_empty());
}

/// **Scenario**: A pending authorization writes the three notices, waits, and proceeds once granted.
#[tokio::test]
async fn pending_authorization_granted_while_waiting() {
    let h = Harness::new(vec![list_emails_turn()], &["list_emails"]);
    let registry = h.registry.clone();
    let granter = tokio::spawn(async move {
        while registry.pending_ids().is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(registry.grant(USER, "list_emails"));
    });

    let outcome = h
        .processor()
        .with_auth_timeout(Duration::from_secs(5))
        .process_turn(&[Message::user("list my emails")], USER)
        .await
        .unwrap();
    granter.await.unwrap();

    assert_eq!(outcome.next, TurnDecision::RunTools);
    let writes = h.sink.writes();
    assert_eq!(writes.len(), 3);
    assert_eq!(writes[0], "\n🔐 Authorization required for list_emails\n\n");
    assert!(writes[1].starts_with(&format!(
        "Visit the following URL to authorize:\n{}?tool=list_emails",
        AUTH_URL_BASE
    )));
    assert!(writes[1].ends_with("\n\n"));
    assert_eq!(writes[2], "Waiting for authorization...\n\n");
}

/// **Scenario**: An authorization that never completes fails naming the tool, and no tool runs.
#[tokio::test]
async fn never_completing_authorization_fails_without_running_tools() {
    let h = Harness::new(vec![list_emails_turn()], &["list_emails"]);
    let tools = Arc::new(MockToolSource::with_tool_names(&["list_emails"], "[]"));
    let runner = AgentRunner::new(
        h.processor().with_auth_timeout(Duration::from_millis(50)),
        tools.clone(),
    );
    let err = runner
        .run(vec![Message::user("list my emails")], USER)
        .await
        .unwrap_err();
    match err {
        RunError::Turn(TurnError::AuthorizationFailed { tool }) => assert_eq!(tool, "list_emails"),
        other => panic!("expected AuthorizationFailed, got {:?}", other),
    }
    assert!(tools.calls().is_empty());
    assert!(h.sink.contents().contains("Waiting for authorization..."));
}

/// **Scenario**: A rejected authorization fails right after the wait ends.
#[tokio::test]
async fn rejected_authorization_fails() {
    let h = Harness::new(vec![list_emails_turn()], &["list_emails"]);
    let registry = h.registry.clone();
    let rejecter = tokio::spawn(async move {
        loop {
            if let Some(id) = registry.pending_ids().into_iter().next() {
                assert!(registry.reject(&id));
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    });
    let err = h
        .processor()
        .process_turn(&[Message::user("list my emails")], USER)
        .await
        .unwrap_err();
    rejecter.await.unwrap();
    assert!(matches!(err, TurnError::AuthorizationFailed { ref tool } if tool == "list_emails"));
}

/// **Scenario**: Cancelling the token aborts the wait with Cancelled.
#[tokio::test]
async fn cancellation_aborts_wait() {
    let h = Harness::new(vec![list_emails_turn()], &["list_emails"]);
    let cancel = CancellationToken::new();
    let p = h.processor().with_cancellation(cancel.clone());
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
    });
    let err = p
        .process_turn(&[Message::user("list my emails")], USER)
        .await
        .unwrap_err();
    canceller.await.unwrap();
    assert!(matches!(err, TurnError::Cancelled));
}

/// **Scenario**: With two auth tools, a granted first and an unauthorized second fails on the second.
#[tokio::test]
async fn fails_fast_on_first_unauthorized_tool() {
    let h = Harness::new(
        vec![MockTurn::with_tool_calls(
            "",
            vec![
                ToolCall::new("list_emails", json!({})),
                ToolCall::new("list_tasks", json!({})),
            ],
        )],
        &["list_emails", "list_tasks"],
    );
    h.registry.grant(USER, "list_emails");
    let err = h
        .processor()
        .with_auth_timeout(Duration::from_millis(20))
        .process_turn(&[Message::user("emails and tasks")], USER)
        .await
        .unwrap_err();
    assert!(matches!(err, TurnError::AuthorizationFailed { ref tool } if tool == "list_tasks"));
    assert!(h.sink.contents().contains("Authorization required for list_tasks"));
    assert!(!h.sink.contents().contains("Authorization required for list_emails"));
}
