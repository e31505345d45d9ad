//! The memory system facade
//!
//! `MemorySystem` wires the episodic log, salience scorer, consolidator,
//! and long-term store together and is the only type external callers
//! need. Producers hand it fully-formed conversation records; everything
//! downstream (scoring, extraction, persistence, retrieval) happens behind
//! this boundary.

use std::sync::Arc;

use tracing::info;

use crate::config::{Config, RetrievalStrategy};
use crate::consolidate::Consolidator;
use crate::episodic::EpisodicLog;
use crate::error::{LimbicError, Result};
use crate::retrieval::{LexicalIndex, RetrievalIndex, SimilarityIndex};
use crate::salience::SalienceScorer;
use crate::storage::LongTermStore;
use crate::types::{
    Category, ConsolidationReport, ContextSnapshot, ConversationRecord, MemoryEntry, SearchResult,
    SystemStatus,
};

/// Importance assigned to manually remembered entries
const MANUAL_IMPORTANCE: f32 = 0.7;

/// How many recent conversations a context snapshot considers
const CONTEXT_RECENT: usize = 5;

/// Facade over the capture → salience → consolidation → retrieval pipeline
pub struct MemorySystem {
    config: Config,
    episodic: EpisodicLog,
    long_term: LongTermStore,
    consolidator: Consolidator,
}

impl MemorySystem {
    /// Open the system with the retrieval strategy named in the config
    pub fn open(config: Config) -> Result<Self> {
        let index: Box<dyn RetrievalIndex> = match config.retrieval.strategy {
            RetrievalStrategy::Lexical => Box::new(LexicalIndex::new()),
            RetrievalStrategy::Similarity => Box::new(SimilarityIndex::default()),
        };
        Self::open_with_index(config, index)
    }

    /// Open the system with a caller-supplied retrieval backend.
    ///
    /// Creates all partition directories and registers the salience scorer
    /// as a capture observer, so every capture is scored exactly once at
    /// capture time.
    pub fn open_with_index(config: Config, index: Box<dyn RetrievalIndex>) -> Result<Self> {
        let scorer = Arc::new(SalienceScorer::open(config.salience_dir())?);

        let mut episodic = EpisodicLog::open(config.episodic_dir())?;
        episodic.register_observer(scorer.clone());

        let long_term = LongTermStore::open(config.long_term_dir(), index)?;
        let consolidator = Consolidator::open(config.consolidation_dir(), scorer)?;

        info!(
            "Opened memory system at {}",
            config.storage.data_dir.display()
        );
        Ok(Self {
            config,
            episodic,
            long_term,
            consolidator,
        })
    }

    /// Capture a conversation into the episodic log, returning its id.
    ///
    /// The record must carry a non-empty id and at least one message;
    /// anything else fails fast with a validation error.
    pub fn capture(&mut self, record: ConversationRecord) -> Result<String> {
        if record.id.trim().is_empty() {
            return Err(LimbicError::Validation(
                "conversation id must not be empty".to_string(),
            ));
        }
        if record.messages.is_empty() {
            return Err(LimbicError::Validation(
                "conversation must contain at least one message".to_string(),
            ));
        }
        self.episodic.append(record)
    }

    /// Store a fact directly, bypassing extraction.
    ///
    /// Manual entries get importance 0.7 and source `"manual"`. Returns the
    /// content-derived id.
    pub fn remember(
        &mut self,
        content: &str,
        category: Category,
        tags: Vec<String>,
    ) -> Result<String> {
        if content.trim().is_empty() {
            return Err(LimbicError::Validation(
                "memory content must not be empty".to_string(),
            ));
        }
        let entry =
            MemoryEntry::from_content(content, category, "manual", tags, MANUAL_IMPORTANCE);
        let id = entry.id.clone();
        self.long_term.upsert(entry)?;
        Ok(id)
    }

    /// Search long-term memory with the configured strategy
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        self.long_term.search(query, limit)
    }

    /// Consolidate a batch of conversations into long-term memory
    pub fn consolidate(
        &mut self,
        records: &[ConversationRecord],
    ) -> Result<ConsolidationReport> {
        self.consolidator.consolidate(&mut self.long_term, records)
    }

    /// Consolidate everything captured during the current UTC day.
    ///
    /// This is the entry point a scheduled run invokes.
    pub fn consolidate_today(&mut self) -> Result<ConsolidationReport> {
        let records = self.episodic.all_for_today()?;
        self.consolidate(&records)
    }

    /// Snapshot of everything the system knows: entry contents bucketed by
    /// category, plus totals. Read-only, never persisted.
    pub fn context(&self) -> Result<ContextSnapshot> {
        let entries = self.long_term.list(None)?;
        let total_memories = entries.len();

        let mut identity = Vec::new();
        let mut preferences = Vec::new();
        let mut knowledge = Vec::new();
        for entry in entries {
            match entry.category {
                Category::Identity => identity.push(entry.content),
                Category::Preference => preferences.push(entry.content),
                Category::Knowledge | Category::General => knowledge.push(entry.content),
            }
        }

        Ok(ContextSnapshot {
            identity,
            preferences,
            knowledge,
            recent_conversations: self.episodic.recent(CONTEXT_RECENT)?.len(),
            total_memories,
            total_conversations: self.episodic.count()?,
        })
    }

    /// Counters and the storage location, for observability
    pub fn status(&self) -> Result<SystemStatus> {
        Ok(SystemStatus {
            conversations_captured: self.episodic.count()?,
            memories_stored: self.long_term.count()?,
            data_dir: self.config.storage.data_dir.clone(),
        })
    }

    /// Up to `n` captured conversations, newest first
    pub fn recent_conversations(&self, n: usize) -> Result<Vec<ConversationRecord>> {
        self.episodic.recent(n)
    }

    /// Stored entries, optionally filtered by category, sorted by id
    pub fn memories(&self, category: Option<Category>) -> Result<Vec<MemoryEntry>> {
        self.long_term.list(category)
    }

    /// The configuration the system was opened with
    pub fn config(&self) -> &Config {
        &self.config
    }
}
