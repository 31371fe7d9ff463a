//! Shared harness: a processor over MockLlm, InMemoryStore, StaticCapabilityRegistry and BufferSink.

use std::sync::Arc;

use agentmem::{
    BufferSink, InMemoryStore, MockLlm, MockTurn, Namespace, StaticCapabilityRegistry, Store,
    StoreError, StoreSearchHit, TurnProcessor,
};
use async_trait::async_trait;
use serde_json::Value;

pub const USER: &str = "jane.doe@example.com";
pub const AUTH_URL_BASE: &str = "https://auth.test/authorize";

pub struct Harness {
    pub llm: Arc<MockLlm>,
    pub store: Arc<InMemoryStore>,
    pub registry: Arc<StaticCapabilityRegistry>,
    pub sink: Arc<BufferSink>,
}

impl Harness {
    pub fn new(turns: Vec<MockTurn>, auth_tools: &[&str]) -> Self {
        Self {
            llm: Arc::new(MockLlm::with_turns(turns)),
            store: Arc::new(InMemoryStore::new()),
            registry: Arc::new(
                StaticCapabilityRegistry::new(auth_tools.iter().copied())
                    .with_url_base(AUTH_URL_BASE),
            ),
            sink: Arc::new(BufferSink::new()),
        }
    }

    pub fn processor(&self) -> TurnProcessor {
        TurnProcessor::new(
            self.llm.clone(),
            self.store.clone(),
            self.registry.clone(),
            self.sink.clone(),
        )
    }
}

/// Store whose every operation fails.
pub struct FailingStore;

#[async_trait]
impl Store for FailingStore {
    async fn put(&self, _: &Namespace, _: &str, _: &Value) -> Result<(), StoreError> {
        Err(StoreError::Storage("backend unavailable".into()))
    }

    async fn get(&self, _: &Namespace, _: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Storage("backend unavailable".into()))
    }

    async fn list(&self, _: &Namespace) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Storage("backend unavailable".into()))
    }

    async fn search(
        &self,
        _: &Namespace,
        _: Option<&str>,
        _: Option<usize>,
    ) -> Result<Vec<StoreSearchHit>, StoreError> {
        Err(StoreError::Storage("backend unavailable".into()))
    }
}
