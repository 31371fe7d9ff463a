//! Model execution error types.
//!
//! Used by `LlmClient::invoke` / `LlmClient::stream` and by the agent loop when a
//! model call or a streamed chunk fails.

use thiserror::Error;

/// Model execution error.
///
/// Returned by `LlmClient` implementations when a request cannot be built, the
/// provider rejects it, or the stream breaks mid-way.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. request build failed, provider error).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
    /// The response stream broke after it started.
    #[error("model stream interrupted: {0}")]
    StreamInterrupted(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display format of ExecutionFailed contains "execution failed" and the message.
    #[test]
    fn agent_error_display_execution_failed() {
        let err = AgentError::ExecutionFailed("msg".to_string());
        let s = err.to_string();
        assert!(
            s.contains("execution failed"),
            "Display should contain 'execution failed': {}",
            s
        );
        assert!(s.contains("msg"), "Display should contain message: {}", s);
    }

    /// **Scenario**: StreamInterrupted names the stream in its Display output.
    #[test]
    fn agent_error_display_stream_interrupted() {
        let err = AgentError::StreamInterrupted("connection reset".to_string());
        let s = err.to_string();
        assert!(s.contains("stream"), "{}", s);
        assert!(s.contains("connection reset"), "{}", s);
    }
}
