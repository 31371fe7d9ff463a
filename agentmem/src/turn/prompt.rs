//! System prompt assembly.

use crate::message::Message;

/// Preamble used when the processor is not configured with another one.
pub const DEFAULT_PREAMBLE: &str = "You are a helpful AI assistant.";

const MEMORIES_HEADER: &str = "User memories:";

/// Word in the latest user message that asks the assistant to store it.
const REMEMBER_TRIGGER: &str = "remember";

/// `"{preamble} User memories:\n- a\n- b"`, or just the preamble when nothing was recalled.
pub fn build_system_prompt(preamble: &str, memories: &[String]) -> String {
    if memories.is_empty() {
        return preamble.to_string();
    }
    let block = memories
        .iter()
        .map(|m| format!("- {}", m))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{} {}\n{}", preamble, MEMORIES_HEADER, block)
}

/// Prepends `system` unless the history already starts with a system message.
pub fn with_system_message(history: &[Message], system: String) -> Vec<Message> {
    match history.first() {
        Some(first) if first.is_system() => history.to_vec(),
        _ => {
            let mut out = Vec::with_capacity(history.len() + 1);
            out.push(Message::system(system));
            out.extend_from_slice(history);
            out
        }
    }
}

/// Case-insensitive check for the remember trigger.
pub fn wants_to_remember(text: &str) -> bool {
    text.to_lowercase().contains(REMEMBER_TRIGGER)
}
