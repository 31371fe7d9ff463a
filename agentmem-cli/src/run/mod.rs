//! Run entry points: run with default config, run_with_config, or run_with_options.

pub use crate::config::Error;

mod common;
mod run_with_config;

use agentmem::Message;

use crate::config::{RunConfig, RunOptions};

pub(crate) use common::{run_agent, Collaborators};
pub use run_with_config::run_with_config;

/// Run one message with default config (from .env); returns the thread's messages.
///
/// Loads `.env` internally, then calls `run_with_config`.
pub async fn run(user_message: &str) -> Result<Vec<Message>, Error> {
    dotenv::dotenv().ok();
    let config = RunConfig::from_env()?;
    run_with_config(&config, user_message).await
}

/// Loads `.env`, builds `RunConfig` from env, applies `options`, then runs.
pub async fn run_with_options(
    user_message: &str,
    options: &RunOptions,
) -> Result<Vec<Message>, Error> {
    dotenv::dotenv().ok();
    let mut config = RunConfig::from_env()?;
    config.apply_options(options);
    run_with_config(&config, user_message).await
}
