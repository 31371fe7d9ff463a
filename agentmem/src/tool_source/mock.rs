//! Mock ToolSource for tests and offline runs.
//!
//! Returns a fixed tool list and fixed call results, and records every call it
//! receives so tests can assert which tools ran.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};

/// Mock tool source: fixed tool list and per-name call results.
///
/// `call_tool` on a name that is not listed returns `ToolSourceError::NotFound`.
pub struct MockToolSource {
    tools: Vec<ToolSpec>,
    /// Text returned for a tool without an entry in `results`.
    call_result: String,
    results: HashMap<String, String>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockToolSource {
    /// Lists one tool `get_time` and returns a fixed time string on call.
    pub fn get_time_example() -> Self {
        Self::new(
            vec![ToolSpec {
                name: "get_time".to_string(),
                description: Some("Get current time.".to_string()),
                input_schema: json!({ "type": "object", "properties": {} }),
            }],
            "2025-01-29 12:00:00".to_string(),
        )
    }

    /// Creates a mock with custom tool list and a fixed call result.
    pub fn new(tools: Vec<ToolSpec>, call_result: String) -> Self {
        Self {
            tools,
            call_result,
            results: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mock listing tools with the given names and empty object schemas.
    pub fn with_tool_names(names: &[&str], call_result: impl Into<String>) -> Self {
        let tools = names
            .iter()
            .map(|n| ToolSpec {
                name: n.to_string(),
                description: None,
                input_schema: json!({ "type": "object", "properties": {} }),
            })
            .collect();
        Self::new(tools, call_result.into())
    }

    /// Set the text returned by call_tool for one tool (builder style).
    pub fn with_result(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.results.insert(name.into(), text.into());
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Default for MockToolSource {
    fn default() -> Self {
        Self::get_time_example()
    }
}

#[async_trait]
impl ToolSource for MockToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        if !self.tools.iter().any(|t| t.name == name) {
            return Err(ToolSourceError::NotFound(name.to_string()));
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((name.to_string(), arguments));
        }
        let text = self
            .results
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.call_result.clone());
        Ok(ToolCallContent { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Listed tools return their configured result and are recorded.
    #[tokio::test]
    async fn call_returns_configured_result() {
        let source = MockToolSource::with_tool_names(&["a", "b"], "default").with_result("b", "bee");
        assert_eq!(source.call_tool("a", json!({})).await.unwrap().text, "default");
        assert_eq!(source.call_tool("b", json!({"x": 1})).await.unwrap().text, "bee");
        let calls = source.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], ("b".to_string(), json!({"x": 1})));
    }

    /// **Scenario**: Unknown tool names are rejected and not recorded.
    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let source = MockToolSource::get_time_example();
        let err = source.call_tool("nope", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolSourceError::NotFound(ref n) if n == "nope"));
        assert!(source.calls().is_empty());
        assert_eq!(source.list_tools().await.unwrap().len(), 1);
    }
}
