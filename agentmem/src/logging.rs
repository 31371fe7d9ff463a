//! Logging helpers for turn and tool execution.
//!
//! Thin wrappers over `tracing` so the processor and the agent loop report the
//! same events with the same fields. Previews of tool output are truncated.

use crate::turn::{TurnDecision, TurnError};

const PREVIEW_CHARS: usize = 200;

/// Log the start of a turn.
pub fn log_turn_start(user_id: &str, history_len: usize) {
    tracing::debug!(user_id = user_id, history_len, "Starting turn");
}

/// Log turn completion with the resolved next step.
pub fn log_turn_complete(next: TurnDecision, tool_calls: usize) {
    tracing::debug!(?next, tool_calls, "Turn complete");
}

/// Log a turn that aborted.
pub fn log_turn_error(error: &TurnError) {
    tracing::error!(?error, "Turn failed");
}

/// Log a tool call about to run.
pub fn log_tool_call(name: &str, arguments: &serde_json::Value) {
    tracing::debug!(tool = name, args = %arguments, "Calling tool");
}

/// Log a tool result (truncated).
pub fn log_tool_result(name: &str, content: &str) {
    tracing::trace!(tool = name, result = %preview(content), "Tool returned");
}

/// First `PREVIEW_CHARS` characters of `text`, with an ellipsis when cut.
pub(crate) fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
