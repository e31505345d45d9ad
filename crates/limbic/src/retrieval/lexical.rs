//! Token-overlap search, the default strategy
//!
//! No model, no index maintenance: entries are scored by how much of the
//! query's vocabulary they cover, weighted by stored importance.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::{RetrievalIndex, tokenize};
use crate::error::Result;
use crate::types::{MemoryEntry, SearchResult};

/// Lexical token-overlap scorer.
///
/// An entry matches on its content, its tags, and its category name, so
/// `search("preference")` surfaces preference entries even when the word
/// never appears in their text. Score is the fraction of query tokens the
/// entry covers, scaled by the entry's importance:
///
/// ```text
/// score = |query ∩ entry| / |query| × importance
/// ```
///
/// Entries sharing no token with the query are omitted entirely.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicalIndex;

impl LexicalIndex {
    pub fn new() -> Self {
        Self
    }
}

impl RetrievalIndex for LexicalIndex {
    fn search(
        &self,
        entries: &[MemoryEntry],
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let query_tokens: BTreeSet<String> = tokenize(query).into_iter().collect();
        if query_tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut results = Vec::new();
        for entry in entries {
            let mut entry_tokens: BTreeSet<String> =
                tokenize(&entry.content).into_iter().collect();
            for tag in &entry.tags {
                entry_tokens.extend(tokenize(tag));
            }
            entry_tokens.insert(entry.category.as_str().to_string());

            let overlap = query_tokens.intersection(&entry_tokens).count();
            if overlap == 0 {
                continue;
            }

            let score = overlap as f32 / query_tokens.len() as f32 * entry.importance;
            results.push(SearchResult {
                entry: entry.clone(),
                score,
            });
        }

        // Stable sort keeps the store's id order for ties
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results.truncate(limit);
        Ok(results)
    }
}
