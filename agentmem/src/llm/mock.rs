//! Scripted LLM for tests and offline runs.
//!
//! Each call consumes the next scripted turn; when the script runs out the last
//! turn is replayed. Every prompt received is recorded for assertions.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChunkStream, LlmChunk, LlmClient, LlmResponse};
use crate::error::AgentError;
use crate::message::Message;
use crate::tool_call::{ToolCall, ToolCallAccumulator, ToolCallDelta};

/// One scripted model turn: the chunks to stream, optionally followed by a failure.
#[derive(Debug, Clone, Default)]
pub struct MockTurn {
    pub chunks: Vec<LlmChunk>,
    /// When set, the stream yields this error after all chunks.
    pub fail_with: Option<String>,
}

impl MockTurn {
    /// A turn answering with plain text and no tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            chunks: vec![LlmChunk::text(content)],
            fail_with: None,
        }
    }

    /// A turn answering with text followed by complete tool calls.
    pub fn with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        let content = content.into();
        let mut chunks = Vec::new();
        if !content.is_empty() {
            chunks.push(LlmChunk::text(content));
        }
        let deltas = tool_calls
            .into_iter()
            .map(|tc| ToolCallDelta {
                index: None,
                id: tc.id,
                name: Some(tc.name),
                arguments: Some(tc.arguments.to_string()),
            })
            .collect();
        chunks.push(LlmChunk::tool_calls(deltas));
        Self {
            chunks,
            fail_with: None,
        }
    }

    pub fn from_chunks(chunks: Vec<LlmChunk>) -> Self {
        Self {
            chunks,
            fail_with: None,
        }
    }

    /// Streams `chunks`, then fails with `message`.
    pub fn failing_after(chunks: Vec<LlmChunk>, message: impl Into<String>) -> Self {
        Self {
            chunks,
            fail_with: Some(message.into()),
        }
    }
}

/// Mock LLM client replaying scripted turns.
///
/// **Interaction**: Implements `LlmClient`; injected into `TurnProcessor` in tests and
/// by the CLI when no API key is configured.
pub struct MockLlm {
    turns: Mutex<VecDeque<MockTurn>>,
    last: Mutex<MockTurn>,
    received: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    pub fn with_turns(turns: Vec<MockTurn>) -> Self {
        let last = turns.last().cloned().unwrap_or_default();
        Self {
            turns: Mutex::new(turns.into()),
            last: Mutex::new(last),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `content` and no tool calls.
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::with_turns(vec![MockTurn::text(content)])
    }

    /// Prompts received so far, one entry per call.
    pub fn received(&self) -> Vec<Vec<Message>> {
        self.received
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn next_turn(&self, messages: &[Message]) -> MockTurn {
        if let Ok(mut received) = self.received.lock() {
            received.push(messages.to_vec());
        }
        let next = self.turns.lock().ok().and_then(|mut t| t.pop_front());
        match next {
            Some(turn) => {
                if let Ok(mut last) = self.last.lock() {
                    *last = turn.clone();
                }
                turn
            }
            None => self.last.lock().map(|t| t.clone()).unwrap_or_default(),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let turn = self.next_turn(messages);
        if let Some(msg) = turn.fail_with {
            return Err(AgentError::ExecutionFailed(msg));
        }
        let mut content = String::new();
        let mut acc = ToolCallAccumulator::new();
        for chunk in turn.chunks {
            if let Some(text) = chunk.content {
                content.push_str(&text);
            }
            for delta in chunk.tool_calls {
                acc.push(delta);
            }
        }
        Ok(LlmResponse {
            content,
            tool_calls: acc.finish(),
        })
    }

    async fn stream(&self, messages: &[Message]) -> Result<ChunkStream, AgentError> {
        let turn = self.next_turn(messages);
        let mut items: Vec<Result<LlmChunk, AgentError>> =
            turn.chunks.into_iter().map(Ok).collect();
        if let Some(msg) = turn.fail_with {
            items.push(Err(AgentError::StreamInterrupted(msg)));
        }
        Ok(Box::pin(tokio_stream::iter(items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_stream::StreamExt;

    /// **Scenario**: Turns are consumed in order and the last one is replayed.
    #[tokio::test]
    async fn turns_consumed_in_order_then_last_replayed() {
        let llm = MockLlm::with_turns(vec![MockTurn::text("one"), MockTurn::text("two")]);
        let msgs = [Message::user("hi")];
        assert_eq!(llm.invoke(&msgs).await.unwrap().content, "one");
        assert_eq!(llm.invoke(&msgs).await.unwrap().content, "two");
        assert_eq!(llm.invoke(&msgs).await.unwrap().content, "two");
        assert_eq!(llm.received().len(), 3);
    }

    /// **Scenario**: A failing turn streams its chunks and then an error.
    #[tokio::test]
    async fn failing_turn_streams_then_errors() {
        let llm = MockLlm::with_turns(vec![MockTurn::failing_after(
            vec![LlmChunk::text("partial")],
            "boom",
        )]);
        let mut s = llm.stream(&[Message::user("hi")]).await.unwrap();
        assert_eq!(
            s.next().await.unwrap().unwrap().content.as_deref(),
            Some("partial")
        );
        assert!(s.next().await.unwrap().is_err());
        assert!(s.next().await.is_none());
    }

    /// **Scenario**: invoke assembles tool calls from the scripted chunks.
    #[tokio::test]
    async fn invoke_collects_tool_calls() {
        let llm = MockLlm::with_turns(vec![MockTurn::with_tool_calls(
            "",
            vec![ToolCall::new("get_time", json!({}))],
        )]);
        let resp = llm.invoke(&[Message::user("time?")]).await.unwrap();
        assert!(resp.content.is_empty());
        assert_eq!(resp.tool_calls[0].name, "get_time");
    }
}
