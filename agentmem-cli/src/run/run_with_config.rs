//! Run with given config; does not read .env, returns the thread's messages.
//!
//! Builds the OpenAI client bound to the tool list, opens the store and checkpointer
//! (SQLite at `DB_PATH` with feature `sqlite`, in-memory otherwise), and streams the
//! answer to stdout.

use std::sync::Arc;

use agentmem::{ChatOpenAI, Checkpointer, Message, StdoutSink, Store, ToolSource};
use async_openai::config::OpenAIConfig;

use crate::config::RunConfig;

use super::{run_agent, Collaborators, Error};

pub async fn run_with_config(config: &RunConfig, user_message: &str) -> Result<Vec<Message>, Error> {
    let tools = tool_source();
    let specs = tools.list_tools().await?;

    let openai_config = OpenAIConfig::new()
        .with_api_base(&config.api_base)
        .with_api_key(config.api_key.clone());
    let mut llm = ChatOpenAI::with_config(openai_config, config.model.clone()).with_tools(specs);
    if let Some(t) = config.temperature {
        llm = llm.with_temperature(t);
    }
    if let Some(tc) = config.tool_choice {
        llm = llm.with_tool_choice(tc);
    }

    let (store, checkpointer) = open_persistence(config)?;

    run_agent(
        config,
        user_message,
        Collaborators {
            llm: Arc::new(llm),
            tools,
            store,
            checkpointer,
            sink: Arc::new(StdoutSink),
        },
    )
    .await
}

#[cfg(feature = "services")]
fn tool_source() -> Arc<dyn ToolSource> {
    Arc::new(agentmem::WeatherToolSource::default())
}

#[cfg(not(feature = "services"))]
fn tool_source() -> Arc<dyn ToolSource> {
    Arc::new(agentmem::MockToolSource::get_time_example())
}

type Persistence = (Arc<dyn Store>, Option<Arc<dyn Checkpointer>>);

#[cfg(feature = "sqlite")]
fn open_persistence(config: &RunConfig) -> Result<Persistence, Error> {
    let path = config.db_path();
    let store: Arc<dyn Store> = Arc::new(agentmem::SqliteStore::new(path)?);
    let checkpointer: Option<Arc<dyn Checkpointer>> = match config.thread_id {
        Some(_) => Some(Arc::new(agentmem::SqliteSaver::new(path)?)),
        None => None,
    };
    Ok((store, checkpointer))
}

#[cfg(not(feature = "sqlite"))]
fn open_persistence(_config: &RunConfig) -> Result<Persistence, Error> {
    Ok((Arc::new(agentmem::InMemoryStore::new()), None))
}
