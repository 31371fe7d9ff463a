//! Optional overrides for a run (CLI args or programmatic).
//!
//! Used by [`RunConfig::apply_options`](super::RunConfig::apply_options) and
//! [`run_with_options`](crate::run_with_options).

use agentmem::ToolChoiceMode;

/// Optional overrides: only set fields replace the env-based values.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Override sampling temperature (0–2).
    pub temperature: Option<f32>,
    /// Override tool choice mode (auto, none, required).
    pub tool_choice: Option<ToolChoiceMode>,
    /// Identity whose memories are recalled and stored.
    pub user_id: Option<String>,
    /// Conversation thread to continue.
    pub thread_id: Option<String>,
    /// Override SQLite database path.
    pub db_path: Option<String>,
    /// Replaces the set of tools that need authorization.
    pub auth_required_tools: Option<Vec<String>>,
    pub auth_timeout_secs: Option<u64>,
    pub recursion_limit: Option<usize>,
    /// Debug logs on stderr.
    pub verbose: bool,
}
