//! Memory record value stored under a user's namespace.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::store::StoreError;

/// Tag of records written from a user message containing the trigger phrase.
pub const TAG_USER_MESSAGE: &str = "user_message";

/// Free-text memory plus a content tag. Serialized as `{"data": ..., "tag": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    #[serde(rename = "data")]
    pub content: String,
    #[serde(default)]
    pub tag: Option<String>,
}

impl MemoryRecord {
    pub fn from_user_message(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tag: Some(TAG_USER_MESSAGE.to_string()),
        }
    }

    pub fn to_value(&self) -> Result<Value, StoreError> {
        serde_json::to_value(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Reads a record back; a bare JSON string is accepted as untagged content.
    pub fn from_value(value: &Value) -> Option<Self> {
        if let Some(s) = value.as_str() {
            return Some(Self {
                content: s.to_string(),
                tag: None,
            });
        }
        serde_json::from_value(value.clone()).ok()
    }
}
