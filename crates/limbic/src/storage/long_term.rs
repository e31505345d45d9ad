//! Durable fact storage, partitioned by category
//!
//! Identity, preference, and general entries live in the store's root
//! directory; knowledge entries live in a `knowledge/` sub-partition. The
//! split is invisible to callers beyond category filtering. Search is
//! delegated to the [`RetrievalIndex`] chosen at construction.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::content::ContentStore;
use crate::error::{LimbicError, Result};
use crate::retrieval::RetrievalIndex;
use crate::types::{Category, MemoryEntry, SearchResult};

/// Category-partitioned store of [`MemoryEntry`] records
pub struct LongTermStore {
    default_partition: ContentStore,
    knowledge_partition: ContentStore,
    index: Box<dyn RetrievalIndex>,
}

impl LongTermStore {
    /// Open the store rooted at `dir`, creating partitions as needed
    pub fn open(dir: impl Into<PathBuf>, index: Box<dyn RetrievalIndex>) -> Result<Self> {
        let dir = dir.into();
        let default_partition = ContentStore::open(&dir)?;
        let knowledge_partition = ContentStore::open(dir.join("knowledge"))?;
        Ok(Self {
            default_partition,
            knowledge_partition,
            index,
        })
    }

    /// Home partition for a category, paired with its sibling
    fn partitions_mut(&mut self, category: Category) -> (&mut ContentStore, &mut ContentStore) {
        match category {
            Category::Knowledge => (&mut self.knowledge_partition, &mut self.default_partition),
            _ => (&mut self.default_partition, &mut self.knowledge_partition),
        }
    }

    /// Insert or overwrite an entry.
    ///
    /// The id is content-derived while the partition is category-derived, so
    /// when a re-extracted entry changes category its id is removed from the
    /// sibling partition. An id never exists in both partitions.
    pub fn upsert(&mut self, entry: MemoryEntry) -> Result<()> {
        let category = entry.category;
        let (home, sibling) = self.partitions_mut(category);
        home.save(&entry.id, &entry)?;
        if sibling.delete(&entry.id)? {
            debug!("Moved entry {} into the {category} partition", entry.id);
        }
        Ok(())
    }

    /// Look up an entry by id across both partitions.
    ///
    /// A corrupt file under the id is treated as absent (logged), matching
    /// the read-path policy everywhere else in the store.
    pub fn get(&self, id: &str) -> Result<Option<MemoryEntry>> {
        for partition in [&self.default_partition, &self.knowledge_partition] {
            match partition.load::<MemoryEntry>(id) {
                Ok(Some(entry)) => return Ok(Some(entry)),
                Ok(None) => {}
                Err(LimbicError::Serialization(reason)) => {
                    warn!("Skipping corrupt memory entry {id}: {reason}");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    /// All entries, optionally filtered by category, sorted by id.
    ///
    /// Corrupt entry files are skipped and logged, never surfaced.
    pub fn list(&self, category: Option<Category>) -> Result<Vec<MemoryEntry>> {
        let mut entries = match category {
            Some(Category::Knowledge) => self.read_partition(&self.knowledge_partition)?,
            Some(_) => self.read_partition(&self.default_partition)?,
            None => {
                let mut all = self.read_partition(&self.default_partition)?;
                all.extend(self.read_partition(&self.knowledge_partition)?);
                all
            }
        };
        if let Some(category) = category {
            entries.retain(|entry| entry.category == category);
        }
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(entries)
    }

    fn read_partition(&self, partition: &ContentStore) -> Result<Vec<MemoryEntry>> {
        let mut entries = Vec::new();
        for name in partition.list()? {
            match partition.load::<MemoryEntry>(&name) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {}
                Err(LimbicError::Serialization(reason)) => {
                    warn!("Skipping corrupt memory entry {name}: {reason}");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(entries)
    }

    /// Search stored entries with the configured strategy.
    ///
    /// A whitespace-only query yields no results; the limit is clamped to
    /// the number of stored entries before the index runs.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let entries = self.list(None)?;
        let limit = limit.min(entries.len());
        self.index.search(&entries, query, limit)
    }

    /// Total entries across both partitions
    pub fn count(&self) -> Result<usize> {
        Ok(self.list(None)?.len())
    }

    /// Directory holding the default partition
    pub fn dir(&self) -> &Path {
        self.default_partition.dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::LexicalIndex;

    fn open_store(dir: &Path) -> LongTermStore {
        LongTermStore::open(dir, Box::new(LexicalIndex::new())).expect("Failed to open store")
    }

    fn entry(content: &str, category: Category) -> MemoryEntry {
        MemoryEntry::from_content(content, category, "manual", Vec::new(), 0.7)
    }

    #[test]
    fn test_upsert_and_get() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = open_store(dir.path());

        let identity = entry("My name is Alex", Category::Identity);
        let id = identity.id.clone();
        store.upsert(identity).expect("Failed to upsert");

        let found = store.get(&id).expect("Failed to get");
        assert_eq!(found.map(|e| e.content), Some("My name is Alex".to_string()));
        assert!(store.get("missing").expect("Failed to get").is_none());
    }

    #[test]
    fn test_knowledge_lands_in_sub_partition() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = open_store(dir.path());

        let fact = entry("Rust has no garbage collector", Category::Knowledge);
        let id = fact.id.clone();
        store.upsert(fact).expect("Failed to upsert");

        assert!(dir.path().join("knowledge").join(format!("{id}.json")).is_file());
        assert!(!dir.path().join(format!("{id}.json")).exists());
        assert!(store.get(&id).expect("Failed to get").is_some());
    }

    #[test]
    fn test_category_change_moves_between_partitions() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = open_store(dir.path());

        let first = entry("Berlin is in Germany", Category::Knowledge);
        let id = first.id.clone();
        store.upsert(first).expect("Failed to upsert");

        // Same content reclassified: must leave exactly one file behind
        let second = entry("Berlin is in Germany", Category::General);
        store.upsert(second).expect("Failed to upsert");

        assert!(dir.path().join(format!("{id}.json")).is_file());
        assert!(!dir.path().join("knowledge").join(format!("{id}.json")).exists());
        assert_eq!(store.count().expect("Failed to count"), 1);
    }

    #[test]
    fn test_list_filters_and_sorts_by_id() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = open_store(dir.path());

        store.upsert(entry("My name is Alex", Category::Identity)).expect("Failed to upsert");
        store.upsert(entry("I like tea", Category::Preference)).expect("Failed to upsert");
        store.upsert(entry("Water boils at 100C", Category::Knowledge)).expect("Failed to upsert");

        let all = store.list(None).expect("Failed to list");
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].id <= w[1].id));

        let identity = store.list(Some(Category::Identity)).expect("Failed to list");
        assert_eq!(identity.len(), 1);
        assert_eq!(identity[0].content, "My name is Alex");

        let knowledge = store.list(Some(Category::Knowledge)).expect("Failed to list");
        assert_eq!(knowledge.len(), 1);
    }

    #[test]
    fn test_corrupt_entry_skipped_on_list() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = open_store(dir.path());
        store.upsert(entry("I like tea", Category::Preference)).expect("Failed to upsert");
        std::fs::write(dir.path().join("broken.json"), "{not json").expect("Failed to write");

        let all = store.list(None).expect("Failed to list");
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_search_contract() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = open_store(dir.path());
        store.upsert(entry("I live in Berlin", Category::Identity)).expect("Failed to upsert");

        assert!(store.search("   ", 10).expect("Search failed").is_empty());
        let results = store.search("Berlin", 10).expect("Search failed");
        assert_eq!(results.len(), 1);
        assert!(results[0].score > 0.0);
    }
}
