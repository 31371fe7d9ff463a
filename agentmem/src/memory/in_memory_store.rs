use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::memory::store::{
    rank_rows, Namespace, Store, StoreError, StoreSearchHit, DEFAULT_SEARCH_LIMIT,
};

/// In-memory store with term-overlap search.
///
/// **Interaction**: Used as `Arc<dyn Store>` by `TurnProcessor` in tests and by the
/// CLI when persistence is off. All data is lost when the store is dropped.
#[derive(Default)]
pub struct InMemoryStore {
    data: DashMap<String, Entry>,
    next_seq: AtomicU64,
}

#[derive(Clone)]
struct Entry {
    namespace: Namespace,
    key: String,
    value: Value,
    seq: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a compound key from namespace and key.
    fn make_key(namespace: &Namespace, key: &str) -> String {
        format!("{}:{}", serde_json::to_string(namespace).unwrap_or_default(), key)
    }

    fn rows(&self, namespace: &Namespace) -> Vec<(u64, String, Value)> {
        self.data
            .iter()
            .filter(|e| &e.namespace == namespace)
            .map(|e| (e.seq, e.key.clone(), e.value.clone()))
            .collect()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn put(&self, namespace: &Namespace, key: &str, value: &Value) -> Result<(), StoreError> {
        let compound_key = Self::make_key(namespace, key);
        self.data
            .entry(compound_key)
            .and_modify(|e| e.value = value.clone())
            .or_insert_with(|| Entry {
                namespace: namespace.clone(),
                key: key.to_string(),
                value: value.clone(),
                seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            });
        Ok(())
    }

    async fn get(&self, namespace: &Namespace, key: &str) -> Result<Option<Value>, StoreError> {
        let compound_key = Self::make_key(namespace, key);
        Ok(self.data.get(&compound_key).map(|e| e.value.clone()))
    }

    async fn list(&self, namespace: &Namespace) -> Result<Vec<String>, StoreError> {
        let mut rows = self.rows(namespace);
        rows.sort_by_key(|(seq, _, _)| *seq);
        Ok(rows.into_iter().map(|(_, key, _)| key).collect())
    }

    async fn search(
        &self,
        namespace: &Namespace,
        query: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<StoreSearchHit>, StoreError> {
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).min(1000);
        Ok(rank_rows(self.rows(namespace), query, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// **Scenario**: put then get returns the value; missing keys return None.
    #[tokio::test]
    async fn put_get() {
        let store = InMemoryStore::new();
        let ns = vec!["memories".into(), "u1".into()];
        store.put(&ns, "k1", &json!({"data": "hello"})).await.unwrap();
        assert_eq!(
            store.get(&ns, "k1").await.unwrap(),
            Some(json!({"data": "hello"}))
        );
        assert_eq!(store.get(&ns, "missing").await.unwrap(), None);
    }

    /// **Scenario**: Re-putting a key replaces the value without adding an entry.
    #[tokio::test]
    async fn put_is_idempotent_per_key() {
        let store = InMemoryStore::new();
        let ns = vec!["memories".into()];
        store.put(&ns, "k", &json!("v1")).await.unwrap();
        store.put(&ns, "k", &json!("v2")).await.unwrap();
        assert_eq!(store.list(&ns).await.unwrap(), vec!["k".to_string()]);
        assert_eq!(store.get(&ns, "k").await.unwrap(), Some(json!("v2")));
    }

    /// **Scenario**: Namespaces are isolated for list and search.
    #[tokio::test]
    async fn namespace_isolation() {
        let store = InMemoryStore::new();
        let ns1 = vec!["memories".into(), "user1".into()];
        let ns2 = vec!["memories".into(), "user2".into()];
        store.put(&ns1, "a", &json!({"data": "likes tea"})).await.unwrap();
        store.put(&ns2, "b", &json!({"data": "likes coffee"})).await.unwrap();

        assert_eq!(store.list(&ns1).await.unwrap(), vec!["a".to_string()]);
        let hits = store.search(&ns2, Some("likes"), None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key, "b");
    }

    /// **Scenario**: Search ranks by relevance and honours the limit.
    #[tokio::test]
    async fn search_ranks_and_limits() {
        let store = InMemoryStore::new();
        let ns = vec!["memories".into()];
        store.put(&ns, "1", &json!({"data": "dentist on friday"})).await.unwrap();
        store.put(&ns, "2", &json!({"data": "buy milk friday"})).await.unwrap();
        store.put(&ns, "3", &json!({"data": "buy milk"})).await.unwrap();

        let hits = store.search(&ns, Some("buy milk friday"), Some(2)).await.unwrap();
        let keys: Vec<&str> = hits.iter().map(|h| h.key.as_str()).collect();
        assert_eq!(keys, vec!["2", "3"]);
    }
}
