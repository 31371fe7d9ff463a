//! LLM client abstraction for the turn processor.
//!
//! The processor streams the model over the assembled prompt and accumulates
//! text and tool-call fragments; this module defines the trait, the chunk type
//! and a scripted mock implementation.

mod mock;

#[cfg(feature = "openai")]
mod openai;

use std::pin::Pin;

use async_trait::async_trait;
use tokio_stream::Stream;

use crate::error::AgentError;
use crate::message::Message;
use crate::tool_call::{ToolCall, ToolCallDelta};

pub use mock::{MockLlm, MockTurn};

#[cfg(feature = "openai")]
pub use openai::ChatOpenAI;

/// Tool choice mode for chat completions: when tools are present, controls whether
/// the model may choose (auto), must not use (none), or must use (required).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ToolChoiceMode {
    /// Model can pick between message or tool calls. Default when tools are present.
    #[default]
    Auto,
    /// Model will not call any tool.
    None,
    /// Model must call one or more tools.
    Required,
}

impl std::str::FromStr for ToolChoiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "none" => Ok(Self::None),
            "required" => Ok(Self::Required),
            _ => Err(format!(
                "unknown tool_choice: {} (use auto, none, or required)",
                s
            )),
        }
    }
}

/// Response from a non-streaming completion: assistant text and tool calls.
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    /// Assistant message content (plain text).
    pub content: String,
    /// Tool calls from this turn; empty means the turn can end.
    pub tool_calls: Vec<ToolCall>,
}

/// One incremental piece of a streamed completion.
///
/// Either field may be empty; a chunk may carry both text and tool-call fragments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmChunk {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallDelta>,
}

impl LlmChunk {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn tool_calls(tool_calls: Vec<ToolCallDelta>) -> Self {
        Self {
            content: None,
            tool_calls,
        }
    }
}

/// Stream of chunks returned by [`LlmClient::stream`]. Ends normally or yields an error.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<LlmChunk, AgentError>> + Send>>;

/// LLM client bound to its tools: given messages, produces assistant text and tool calls.
///
/// Implementations: `MockLlm` (scripted), `ChatOpenAI` (real API, feature `openai`).
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Non-streaming convenience: invoke one turn and return the complete response.
    ///
    /// `TurnProcessor` only streams; this is the building block of the default
    /// [`LlmClient::stream`] for clients without native streaming.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;

    /// Stream one turn. The default implementation invokes and yields a single chunk
    /// holding the whole response.
    async fn stream(&self, messages: &[Message]) -> Result<ChunkStream, AgentError> {
        let response = self.invoke(messages).await?;
        let chunk = LlmChunk {
            content: Some(response.content).filter(|c| !c.is_empty()),
            tool_calls: response
                .tool_calls
                .into_iter()
                .map(|tc| ToolCallDelta {
                    index: None,
                    id: tc.id,
                    name: Some(tc.name),
                    arguments: Some(tc.arguments.to_string()),
                })
                .collect(),
        };
        Ok(Box::pin(tokio_stream::iter(vec![Ok(chunk)])))
    }
}
