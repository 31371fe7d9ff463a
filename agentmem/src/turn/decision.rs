use crate::capability::CapabilityRegistry;
use crate::message::Message;

/// What happens after the model answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDecision {
    /// No tool calls: the turn is over.
    End,
    /// Execute the requested tool calls, then call the model again.
    RunTools,
    /// At least one requested tool needs user authorization before running.
    RequireAuthorization,
}

/// Routes on the tool calls of the most recent assistant message.
///
/// No calls → `End`; any call whose tool requires authorization →
/// `RequireAuthorization`; otherwise `RunTools`.
pub fn decide_next_step(message: &Message, registry: &dyn CapabilityRegistry) -> TurnDecision {
    let calls = message.tool_calls();
    if calls.is_empty() {
        return TurnDecision::End;
    }
    if calls.iter().any(|tc| registry.requires_auth(&tc.name)) {
        TurnDecision::RequireAuthorization
    } else {
        TurnDecision::RunTools
    }
}
