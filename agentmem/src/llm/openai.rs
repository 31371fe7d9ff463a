//! OpenAI Chat Completions client implementing `LlmClient` (ChatOpenAI).
//!
//! Uses the real OpenAI Chat Completions API, streaming by default for the turn
//! processor. Requires `OPENAI_API_KEY` (or explicit config). Tools bound with
//! `with_tools` are sent on every request; streamed tool-call fragments are
//! forwarded as `ToolCallDelta`s keyed by the provider's index.
//!
//! **Interaction**: Implements `LlmClient`; used by `TurnProcessor` like `MockLlm`.
//! Depends on `async_openai` (feature `openai`).

use async_trait::async_trait;
use tokio_stream::StreamExt;

use crate::error::AgentError;
use crate::llm::{ChunkStream, LlmChunk, LlmClient, LlmResponse};
use crate::message::Message;
use crate::tool_call::{ToolCall, ToolCallDelta};
use crate::tool_source::ToolSpec;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCall, ChatCompletionMessageToolCalls,
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestToolMessageArgs,
        ChatCompletionRequestUserMessage, ChatCompletionTool, ChatCompletionToolChoiceOption,
        ChatCompletionTools, CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
        FunctionCall, FunctionObject, ToolChoiceOptions,
    },
    Client,
};

use super::ToolChoiceMode;

/// OpenAI Chat Completions client implementing `LlmClient`.
///
/// Uses `OPENAI_API_KEY` from the environment by default; or provide
/// config via `ChatOpenAI::with_config`. Set tools (e.g. from
/// `ToolSource::list_tools()`) to enable tool calls in the response.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    tools: Option<Vec<ToolSpec>>,
    temperature: Option<f32>,
    tool_choice: Option<ToolChoiceMode>,
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            tools: None,
            temperature: None,
            tool_choice: None,
        }
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            tools: None,
            temperature: None,
            tool_choice: None,
        }
    }

    /// Bind tools for every completion (enables tool calls in the response).
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set tool choice mode (auto, none, required). Overrides API default when tools are present.
    pub fn with_tool_choice(mut self, mode: ToolChoiceMode) -> Self {
        self.tool_choice = Some(mode);
        self
    }

    fn messages_to_request(
        messages: &[Message],
    ) -> Result<Vec<ChatCompletionRequestMessage>, AgentError> {
        messages
            .iter()
            .map(|m| match m {
                Message::System { content } => Ok(ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage::from(content.as_str()),
                )),
                Message::User { content } => Ok(ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(content.as_str()),
                )),
                Message::Assistant {
                    content,
                    tool_calls,
                } if tool_calls.is_empty() => {
                    Ok(ChatCompletionRequestMessage::Assistant(content.as_str().into()))
                }
                Message::Assistant {
                    content,
                    tool_calls,
                } => {
                    let calls: Vec<ChatCompletionMessageToolCalls> = tool_calls
                        .iter()
                        .map(|tc| {
                            ChatCompletionMessageToolCalls::Function(
                                ChatCompletionMessageToolCall {
                                    id: tc.id.clone().unwrap_or_else(|| tc.name.clone()),
                                    function: FunctionCall {
                                        name: tc.name.clone(),
                                        arguments: tc.arguments.to_string(),
                                    },
                                },
                            )
                        })
                        .collect();
                    let msg = ChatCompletionRequestAssistantMessageArgs::default()
                        .content(content.as_str())
                        .tool_calls(calls)
                        .build()
                        .map_err(|e| {
                            AgentError::ExecutionFailed(format!(
                                "OpenAI assistant message build failed: {}",
                                e
                            ))
                        })?;
                    Ok(ChatCompletionRequestMessage::Assistant(msg))
                }
                Message::Tool {
                    tool_call_id,
                    name,
                    content,
                } => {
                    let msg = ChatCompletionRequestToolMessageArgs::default()
                        .tool_call_id(tool_call_id.clone().unwrap_or_else(|| name.clone()))
                        .content(content.as_str())
                        .build()
                        .map_err(|e| {
                            AgentError::ExecutionFailed(format!(
                                "OpenAI tool message build failed: {}",
                                e
                            ))
                        })?;
                    Ok(ChatCompletionRequestMessage::Tool(msg))
                }
            })
            .collect()
    }

    fn build_request(
        &self,
        messages: &[Message],
        stream: bool,
    ) -> Result<CreateChatCompletionRequest, AgentError> {
        let openai_messages = Self::messages_to_request(messages)?;
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(openai_messages);
        if stream {
            args.stream(true);
        }

        if let Some(ref tools) = self.tools {
            let chat_tools: Vec<ChatCompletionTools> = tools
                .iter()
                .map(|t| {
                    ChatCompletionTools::Function(ChatCompletionTool {
                        function: FunctionObject {
                            name: t.name.clone(),
                            description: t.description.clone(),
                            parameters: Some(t.input_schema.clone()),
                            ..Default::default()
                        },
                    })
                })
                .collect();
            args.tools(chat_tools);
        }

        if let Some(t) = self.temperature {
            args.temperature(t);
        }

        if let Some(mode) = self.tool_choice {
            let opt = match mode {
                ToolChoiceMode::Auto => ToolChoiceOptions::Auto,
                ToolChoiceMode::None => ToolChoiceOptions::None,
                ToolChoiceMode::Required => ToolChoiceOptions::Required,
            };
            args.tool_choice(ChatCompletionToolChoiceOption::Mode(opt));
        }

        args.build().map_err(|e| {
            AgentError::ExecutionFailed(format!("OpenAI request build failed: {}", e))
        })
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let request = self.build_request(messages, false)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("OpenAI API error: {}", e)))?;

        let choice =
            response.choices.into_iter().next().ok_or_else(|| {
                AgentError::ExecutionFailed("OpenAI returned no choices".to_string())
            })?;

        let msg = choice.message;
        let content = msg.content.unwrap_or_default();
        let tool_calls: Vec<ToolCall> = msg
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tc| {
                if let ChatCompletionMessageToolCalls::Function(f) = tc {
                    let arguments = serde_json::from_str(&f.function.arguments)
                        .unwrap_or(serde_json::Value::String(f.function.arguments));
                    Some(ToolCall::new(f.function.name, arguments).with_id(f.id))
                } else {
                    None
                }
            })
            .collect();

        Ok(LlmResponse {
            content,
            tool_calls,
        })
    }

    async fn stream(&self, messages: &[Message]) -> Result<ChunkStream, AgentError> {
        let request = self.build_request(messages, true)?;

        let stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("OpenAI API error: {}", e)))?;

        let chunks = stream.map(|item| {
            let response =
                item.map_err(|e| AgentError::StreamInterrupted(format!("OpenAI stream: {}", e)))?;
            let mut chunk = LlmChunk::default();
            for choice in response.choices {
                let delta = choice.delta;
                if let Some(text) = delta.content.filter(|t| !t.is_empty()) {
                    chunk.content.get_or_insert_with(String::new).push_str(&text);
                }
                for tc in delta.tool_calls.unwrap_or_default() {
                    let (name, arguments) = match tc.function {
                        Some(f) => (f.name, f.arguments),
                        None => (None, None),
                    };
                    chunk.tool_calls.push(ToolCallDelta {
                        index: Some(tc.index as usize),
                        id: tc.id,
                        name,
                        arguments,
                    });
                }
            }
            Ok(chunk)
        });

        Ok(Box::pin(chunks))
    }
}
