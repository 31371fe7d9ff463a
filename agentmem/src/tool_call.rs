//! Tool calls requested by the model, and the accumulator that assembles them
//! from streamed fragments.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One tool invocation requested by the model.
///
/// `arguments` is the argument mapping (normally a JSON object). `id` is the
/// provider's call id when one was given; tool results answer it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: None,
            name: name.into(),
            arguments,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// A call is valid only when its name is non-empty after trimming.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// A fragment of a tool call as it arrives in one stream chunk.
///
/// Fragments with the same `index` belong to the same call: the name and
/// argument text are concatenated in arrival order. A fragment without an
/// index is a complete call on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCallDelta {
    pub index: Option<usize>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub arguments: Option<String>,
}

impl ToolCallDelta {
    /// A self-contained call (no index): the whole name and argument text at once.
    pub fn complete(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            index: None,
            id: None,
            name: Some(name.into()),
            arguments: Some(arguments.to_string()),
        }
    }
}

#[derive(Debug, Default)]
struct PartialCall {
    index: Option<usize>,
    id: Option<String>,
    name: String,
    arguments: String,
}

/// Accumulates tool-call fragments across a streamed response.
///
/// Calls keep the order in which they first appeared. `finish` drops every call
/// whose name is empty or whitespace-only.
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    calls: Vec<PartialCall>,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, delta: ToolCallDelta) {
        let existing = delta
            .index
            .and_then(|i| self.calls.iter().position(|c| c.index == Some(i)));
        let pos = match existing {
            Some(pos) => pos,
            None => {
                self.calls.push(PartialCall {
                    index: delta.index,
                    ..PartialCall::default()
                });
                self.calls.len() - 1
            }
        };
        let call = &mut self.calls[pos];
        if call.id.is_none() {
            call.id = delta.id;
        }
        if let Some(name) = delta.name {
            call.name.push_str(&name);
        }
        if let Some(args) = delta.arguments {
            call.arguments.push_str(&args);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Consumes the accumulator and returns the valid calls in first-seen order.
    pub fn finish(self) -> Vec<ToolCall> {
        self.calls
            .into_iter()
            .map(|c| ToolCall {
                id: c.id,
                name: c.name.trim().to_string(),
                arguments: parse_arguments(&c.arguments),
            })
            .filter(ToolCall::is_valid)
            .collect()
    }
}

/// Empty text becomes `{}`; text that is not JSON is kept as a JSON string.
fn parse_arguments(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// **Scenario**: An empty-name call and a named call yield only the named call.
    #[test]
    fn finish_drops_empty_name_calls() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(ToolCallDelta::complete("", json!({})));
        acc.push(ToolCallDelta::complete("send_email", json!({"to": "a@b.c"})));
        let calls = acc.finish();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "send_email");
        assert_eq!(calls[0].arguments, json!({"to": "a@b.c"}));
    }

    /// **Scenario**: Whitespace-only names are invalid too.
    #[test]
    fn finish_drops_whitespace_name_calls() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(ToolCallDelta::complete("   ", json!({})));
        assert!(acc.finish().is_empty());
        assert!(!ToolCall::new(" \t", json!({})).is_valid());
        assert!(ToolCall::new("x", json!({})).is_valid());
    }

    /// **Scenario**: Indexed fragments merge name and argument text in arrival order.
    #[test]
    fn indexed_fragments_are_merged() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(ToolCallDelta {
            index: Some(0),
            id: Some("call_1".into()),
            name: Some("list_".into()),
            arguments: Some("{\"lim".into()),
        });
        acc.push(ToolCallDelta {
            index: Some(1),
            id: Some("call_2".into()),
            name: Some("get_time".into()),
            arguments: None,
        });
        acc.push(ToolCallDelta {
            index: Some(0),
            id: None,
            name: Some("emails".into()),
            arguments: Some("it\": 3}".into()),
        });
        let calls = acc.finish();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].id.as_deref(), Some("call_1"));
        assert_eq!(calls[0].name, "list_emails");
        assert_eq!(calls[0].arguments, json!({"limit": 3}));
        assert_eq!(calls[1].name, "get_time");
        assert_eq!(calls[1].arguments, json!({}));
    }

    /// **Scenario**: Argument text that is not JSON is kept verbatim as a string.
    #[test]
    fn invalid_argument_text_is_kept_as_string() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(ToolCallDelta {
            index: None,
            id: None,
            name: Some("echo".into()),
            arguments: Some("not json".into()),
        });
        let calls = acc.finish();
        assert_eq!(calls[0].arguments, Value::String("not json".into()));
    }
}
