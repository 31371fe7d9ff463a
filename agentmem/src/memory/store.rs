//! Long-term store trait: namespaced key-value records with search.
//!
//! Records are grouped by [`Namespace`] (e.g. `["memories", <user>]`). The turn
//! processor searches the namespace with the latest user message and writes one
//! record per remembered message.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Isolation key for records, outermost segment first.
pub type Namespace = Vec<String>;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("storage: {0}")]
    Storage(String),
    #[error("not found")]
    NotFound,
}

/// One search result. `score` is set when the search ranked by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSearchHit {
    pub key: String,
    pub value: Value,
    pub score: Option<f64>,
}

/// Namespaced key-value store with relevance search.
///
/// `put` is idempotent per key. `search` returns hits ranked by the store, most
/// relevant first; callers must not reorder them.
#[async_trait]
pub trait Store: Send + Sync {
    async fn put(&self, namespace: &Namespace, key: &str, value: &Value) -> Result<(), StoreError>;

    async fn get(&self, namespace: &Namespace, key: &str) -> Result<Option<Value>, StoreError>;

    async fn list(&self, namespace: &Namespace) -> Result<Vec<String>, StoreError>;

    async fn search(
        &self,
        namespace: &Namespace,
        query: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<StoreSearchHit>, StoreError>;
}

pub(crate) const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Text used for matching: the `data` field when it is a string, else the JSON text.
pub(crate) fn text_from_value(value: &Value) -> String {
    value
        .get("data")
        .and_then(|v| v.as_str())
        .map(String::from)
        .unwrap_or_else(|| value.to_string())
}

fn terms(text: &str) -> Vec<String> {
    let mut out: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect();
    out.sort();
    out.dedup();
    out
}

/// Ranks `(seq, key, value)` rows against `query`.
///
/// Score is the fraction of distinct query terms present in the record text.
/// Zero-score rows are dropped; ties keep insertion order. Without query terms
/// every row is returned in insertion order with no score.
pub(crate) fn rank_rows(
    mut rows: Vec<(u64, String, Value)>,
    query: Option<&str>,
    limit: usize,
) -> Vec<StoreSearchHit> {
    rows.sort_by_key(|(seq, _, _)| *seq);
    let query_terms = query.map(terms).unwrap_or_default();
    if query_terms.is_empty() {
        return rows
            .into_iter()
            .take(limit)
            .map(|(_, key, value)| StoreSearchHit {
                key,
                value,
                score: None,
            })
            .collect();
    }

    let mut scored: Vec<(f64, u64, String, Value)> = rows
        .into_iter()
        .filter_map(|(seq, key, value)| {
            let record_terms = terms(&text_from_value(&value));
            let matched = query_terms
                .iter()
                .filter(|t| record_terms.binary_search(t).is_ok())
                .count();
            if matched == 0 {
                None
            } else {
                Some((matched as f64 / query_terms.len() as f64, seq, key, value))
            }
        })
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(score, _, key, value)| StoreSearchHit {
            key,
            value,
            score: Some(score),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(seq: u64, key: &str, data: &str) -> (u64, String, Value) {
        (seq, key.to_string(), json!({ "data": data }))
    }

    /// **Scenario**: Rows are ranked by matched-term fraction; non-matching rows are dropped.
    #[test]
    fn rank_rows_orders_by_overlap() {
        let rows = vec![
            row(0, "a", "Remember to buy milk"),
            row(1, "b", "My favourite colour is blue"),
            row(2, "c", "Buy milk and eggs tomorrow"),
        ];
        let hits = rank_rows(rows, Some("buy milk eggs"), 10);
        let keys: Vec<&str> = hits.iter().map(|h| h.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "a"]);
        assert_eq!(hits[0].score, Some(1.0));
    }

    /// **Scenario**: An empty query returns rows in insertion order, unscored, up to the limit.
    #[test]
    fn rank_rows_without_query_keeps_insertion_order() {
        let rows = vec![row(5, "late", "x"), row(1, "early", "y"), row(3, "mid", "z")];
        let hits = rank_rows(rows, Some("  "), 2);
        let keys: Vec<&str> = hits.iter().map(|h| h.key.as_str()).collect();
        assert_eq!(keys, vec!["early", "mid"]);
        assert!(hits.iter().all(|h| h.score.is_none()));
    }

    /// **Scenario**: text_from_value prefers the data field and falls back to JSON text.
    #[test]
    fn text_from_value_prefers_data() {
        assert_eq!(text_from_value(&json!({"data": "hello"})), "hello");
        assert_eq!(text_from_value(&json!("raw")), "\"raw\"");
    }
}
