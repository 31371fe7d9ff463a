//! Run config: OpenAI connection, identity, persistence and authorization settings.
//! Filled from env / .env and adjusted by [`RunOptions`](super::RunOptions).

use std::time::Duration;

use agentmem::{ToolChoiceMode, DEFAULT_AUTH_TIMEOUT};

/// Error type used for config loading and runs.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_DB_PATH: &str = "memory.db";
const DEFAULT_AUTH_URL_BASE: &str = "https://auth.example.com/authorize";
const DEFAULT_CLI_RECURSION_LIMIT: usize = 100;

#[derive(Clone, Debug)]
pub struct RunConfig {
    /// OpenAI API base URL, e.g. `https://api.openai.com/v1`.
    pub api_base: String,
    pub api_key: String,
    /// Model name, e.g. `gpt-4o-mini`.
    pub model: String,
    pub temperature: Option<f32>,
    pub tool_choice: Option<ToolChoiceMode>,
    /// Identity for the memory namespace and authorization grants. Required to run.
    pub user_id: Option<String>,
    /// When set, the conversation is loaded from and saved to this thread.
    pub thread_id: Option<String>,
    /// SQLite database path. Defaults to "memory.db" when DB_PATH is not set.
    pub db_path: Option<String>,
    pub auth_required_tools: Vec<String>,
    pub auth_url_base: String,
    pub auth_timeout: Duration,
    /// Maximum model turns per run.
    pub recursion_limit: usize,
    pub verbose: bool,
}

impl RunConfig {
    /// Fill config from env vars (and .env). Call `dotenv::dotenv().ok()` first, or use `run()`.
    ///
    /// `OPENAI_API_KEY` required; `OPENAI_API_BASE`, `OPENAI_MODEL` (or `MODEL_CHOICE`) have
    /// defaults. `OPENAI_TEMPERATURE`, `OPENAI_TOOL_CHOICE` optional.
    /// Identity and memory: `USER_ID` (or `EMAIL`), `THREAD_ID`, `DB_PATH`.
    /// Authorization: `AUTH_REQUIRED_TOOLS` (comma-separated), `AUTH_URL_BASE`, `AUTH_TIMEOUT_SECS`.
    /// Loop: `RECURSION_LIMIT`.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "OPENAI_API_KEY is not set; please configure it in .env",
            )
        })?;
        let api_base =
            std::env::var("OPENAI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let model = std::env::var("OPENAI_MODEL")
            .or_else(|_| std::env::var("MODEL_CHOICE"))
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let temperature = std::env::var("OPENAI_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse().ok());
        let tool_choice = std::env::var("OPENAI_TOOL_CHOICE")
            .ok()
            .and_then(|s| s.parse().ok());
        let user_id = non_empty_var("USER_ID").or_else(|| non_empty_var("EMAIL"));
        let thread_id = non_empty_var("THREAD_ID");
        let db_path = std::env::var("DB_PATH")
            .ok()
            .or_else(|| Some(DEFAULT_DB_PATH.to_string()));
        let auth_required_tools = std::env::var("AUTH_REQUIRED_TOOLS")
            .map(|s| parse_tool_list(&s))
            .unwrap_or_default();
        let auth_url_base =
            std::env::var("AUTH_URL_BASE").unwrap_or_else(|_| DEFAULT_AUTH_URL_BASE.to_string());
        let auth_timeout = std::env::var("AUTH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_AUTH_TIMEOUT);
        let recursion_limit = std::env::var("RECURSION_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CLI_RECURSION_LIMIT);
        Ok(Self {
            api_base,
            api_key,
            model,
            temperature,
            tool_choice,
            user_id,
            thread_id,
            db_path,
            auth_required_tools,
            auth_url_base,
            auth_timeout,
            recursion_limit,
            verbose: false,
        })
    }

    /// Apply optional overrides from `RunOptions` to this config.
    pub fn apply_options(&mut self, options: &super::RunOptions) {
        if let Some(t) = options.temperature {
            self.temperature = Some(t);
        }
        if let Some(tc) = options.tool_choice {
            self.tool_choice = Some(tc);
        }
        if options.user_id.is_some() {
            self.user_id = options.user_id.clone();
        }
        if options.thread_id.is_some() {
            self.thread_id = options.thread_id.clone();
        }
        if options.db_path.is_some() {
            self.db_path = options.db_path.clone();
        }
        if let Some(tools) = &options.auth_required_tools {
            self.auth_required_tools = tools.clone();
        }
        if let Some(secs) = options.auth_timeout_secs {
            self.auth_timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = options.recursion_limit {
            self.recursion_limit = limit;
        }
        self.verbose = options.verbose;
    }

    pub fn with_user(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    pub fn with_thread(mut self, thread_id: &str) -> Self {
        self.thread_id = Some(thread_id.to_string());
        self
    }

    /// User id for the run, or an error naming the variables that set it.
    pub fn require_user_id(&self) -> Result<&str, Error> {
        self.user_id.as_deref().filter(|u| !u.is_empty()).ok_or_else(|| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "USER_ID (or EMAIL) is not set; pass --user-id or configure it in .env",
            )) as Error
        })
    }

    /// SQLite path, defaulting to "memory.db".
    pub fn db_path(&self) -> &str {
        self.db_path.as_deref().unwrap_or(DEFAULT_DB_PATH)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Splits a comma-separated tool list, dropping blanks.
pub(crate) fn parse_tool_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}
