//! Recall policy applied to store search hits before they enter the prompt.
//!
//! Defaults keep the store's result list verbatim (up to ten hits); dedup and a
//! score threshold can be switched on per processor.

use std::collections::HashSet;

use super::record::MemoryRecord;
use super::store::StoreSearchHit;

/// How near-duplicate memories are collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupPolicy {
    /// Keep every hit.
    #[default]
    Off,
    /// Drop hits whose content is identical to an earlier hit.
    Exact,
    /// Drop hits equal to an earlier one after lowercasing and folding whitespace.
    Normalized,
}

impl std::str::FromStr for DedupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "exact" => Ok(Self::Exact),
            "normalized" => Ok(Self::Normalized),
            _ => Err(format!(
                "unknown dedup policy: {} (use off, exact, or normalized)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecallPolicy {
    /// Maximum hits requested from the store.
    pub limit: usize,
    pub dedup: DedupPolicy,
    /// Hits scored below this are dropped; unscored hits are kept.
    pub min_score: Option<f64>,
}

impl Default for RecallPolicy {
    fn default() -> Self {
        Self {
            limit: 10,
            dedup: DedupPolicy::Off,
            min_score: None,
        }
    }
}

impl RecallPolicy {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_dedup(mut self, dedup: DedupPolicy) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Filters `hits` (kept in store order) and returns the memory contents to recall.
    pub fn apply(&self, hits: Vec<StoreSearchHit>) -> Vec<String> {
        let mut seen = HashSet::new();
        hits.into_iter()
            .filter(|h| match (self.min_score, h.score) {
                (Some(min), Some(score)) => score >= min,
                _ => true,
            })
            .filter_map(|h| MemoryRecord::from_value(&h.value).map(|r| r.content))
            .filter(|content| match self.dedup {
                DedupPolicy::Off => true,
                DedupPolicy::Exact => seen.insert(content.clone()),
                DedupPolicy::Normalized => seen.insert(normalize(content)),
            })
            .take(self.limit)
            .collect()
    }
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
