//! Embedding-based similarity search
//!
//! Entries and query are projected into vectors by an [`Embedder`] and
//! ranked by cosine similarity. The built-in [`HashEmbedder`] is a
//! deterministic feature-hashing projection that needs no model download;
//! the `fastembed` feature swaps in a real multilingual sentence model.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::{RetrievalIndex, tokenize};
use crate::error::Result;
use crate::types::{MemoryEntry, SearchResult};

/// Default vector width, matching the E5-small model
pub const EMBEDDING_DIMENSION: usize = 384;

/// Maps text to a fixed-dimension vector
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Width of the vectors [`Embedder::embed`] produces
    fn dimension(&self) -> usize;
}

/// Deterministic bag-of-tokens projection via feature hashing.
///
/// Each token is hashed into one of `dimension` buckets and counted; the
/// resulting vector is L2-normalized. Texts sharing vocabulary land close
/// together, texts sharing nothing are near-orthogonal, and the same input
/// produces the same vector on every run and every machine.
#[derive(Debug, Clone, Copy)]
pub struct HashEmbedder {
    dimension: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dimension: EMBEDDING_DIMENSION,
        }
    }
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in tokenize(text) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Real sentence embeddings via fastembed's multilingual E5-small model.
///
/// Downloads the model on first use. The model handle is not `Sync`-friendly
/// for shared search handles, so it sits behind a mutex.
#[cfg(feature = "fastembed")]
pub struct FastEmbedder {
    model: std::sync::Mutex<fastembed::TextEmbedding>,
}

#[cfg(feature = "fastembed")]
impl FastEmbedder {
    pub fn new() -> Result<Self> {
        use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

        let model = TextEmbedding::try_new(InitOptions::new(EmbeddingModel::MultilingualE5Small))
            .map_err(|e| crate::error::LimbicError::Embedding(e.to_string()))?;
        Ok(Self {
            model: std::sync::Mutex::new(model),
        })
    }
}

#[cfg(feature = "fastembed")]
impl Embedder for FastEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        use crate::error::LimbicError;

        let mut model = self
            .model
            .lock()
            .map_err(|_| LimbicError::Embedding("embedding model lock poisoned".to_string()))?;
        let embeddings = model
            .embed(vec![text.to_string()], None)
            .map_err(|e| LimbicError::Embedding(e.to_string()))?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| LimbicError::Embedding("No embedding returned".to_string()))
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}

/// Similarity-ranked search over embedded entry content.
///
/// Score is `max(0, cos(query, entry))` rounded to two decimals, so callers
/// see values in [0, 1] and near-duplicates report identically.
pub struct SimilarityIndex {
    embedder: Box<dyn Embedder>,
}

impl SimilarityIndex {
    pub fn new(embedder: impl Embedder + 'static) -> Self {
        Self {
            embedder: Box::new(embedder),
        }
    }
}

impl Default for SimilarityIndex {
    fn default() -> Self {
        Self::new(HashEmbedder::default())
    }
}

impl RetrievalIndex for SimilarityIndex {
    fn search(
        &self,
        entries: &[MemoryEntry],
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(query)?;
        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            let entry_vector = self.embedder.embed(&entry.content)?;
            let score = cosine_similarity(&query_vector, &entry_vector).max(0.0);
            let score = (score * 100.0).round() / 100.0;
            results.push(SearchResult {
                entry: entry.clone(),
                score,
            });
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results.truncate(limit);
        Ok(results)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
