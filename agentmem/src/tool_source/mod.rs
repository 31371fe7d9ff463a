//! Tool sources: list tool specs for the model and execute tool calls.
//!
//! The agent loop runs the calls of an assistant message through a `ToolSource`
//! when the turn decision is `RunTools`. `MockToolSource` serves tests;
//! `WeatherToolSource` (feature `services`) wraps the Open-Meteo clients.

mod mock;
#[cfg(feature = "services")]
mod weather;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use mock::MockToolSource;
#[cfg(feature = "services")]
pub use weather::{WeatherToolSource, TOOL_GET_WEATHER};

/// Tool specification exposed to the model (name, description, JSON schema of arguments).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

/// Text result of one tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallContent {
    pub text: String,
}

/// Errors from listing or calling tools.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("tool call failed: {0}")]
    CallFailed(String),
}

/// Source of tools: what the model may call and how to call it.
#[async_trait]
pub trait ToolSource: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    async fn call_tool(&self, name: &str, arguments: Value)
        -> Result<ToolCallContent, ToolSourceError>;
}
