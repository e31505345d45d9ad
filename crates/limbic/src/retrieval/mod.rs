//! Pluggable search backends for the long-term store
//!
//! Two interchangeable strategies sit behind [`RetrievalIndex`]: a lexical
//! token-overlap scorer and an embedding-based similarity scorer. The store
//! picks one at construction time; nothing probes or switches at runtime.

pub mod lexical;
pub mod semantic;

pub use lexical::LexicalIndex;
#[cfg(feature = "fastembed")]
pub use semantic::FastEmbedder;
pub use semantic::{Embedder, HashEmbedder, SimilarityIndex};

use crate::error::Result;
use crate::types::{MemoryEntry, SearchResult};

/// A search strategy over a slice of stored entries.
///
/// Implementations score every entry against the query, sort descending,
/// and truncate. They may assume the query is non-empty; the store enforces
/// the whitespace-only-query contract before calling in.
pub trait RetrievalIndex: Send + Sync {
    fn search(
        &self,
        entries: &[MemoryEntry],
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>>;
}

/// Lowercased alphanumeric tokens of `text`, in order of appearance.
///
/// Any non-alphanumeric character is a boundary, so "dark-mode!" and
/// "dark mode" tokenize identically.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect()
}
