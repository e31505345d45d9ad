//! Consolidation: episodic records in, durable facts out
//!
//! Each run scores the input conversations, extracts facts from them, and
//! upserts the facts into the long-term store. Entry ids are content-derived,
//! so re-running over the same records rewrites the same files and the store
//! does not grow.

pub mod extract;

pub use extract::{classify, extract_facts};

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::salience::SalienceScorer;
use crate::storage::{ContentStore, LongTermStore};
use crate::types::{ConsolidationReport, ConversationRecord, utc_today};

/// Per-day consolidation log record, one file per UTC day, overwritten by
/// every run that day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationLogRecord {
    /// When the run finished
    pub timestamp: DateTime<Utc>,
    /// Conversations examined
    pub processed: usize,
    /// Entries upserted
    pub created: usize,
}

/// Runs fact extraction over batches of episodic records
pub struct Consolidator {
    scorer: Arc<SalienceScorer>,
    log_store: ContentStore,
}

impl Consolidator {
    /// Open a consolidator whose run log lives under `dir`
    pub fn open(dir: impl Into<PathBuf>, scorer: Arc<SalienceScorer>) -> Result<Self> {
        Ok(Self {
            scorer,
            log_store: ContentStore::open(dir)?,
        })
    }

    /// Consolidate a batch of conversations into the long-term store.
    ///
    /// Salience is computed (and persisted) per conversation and recorded as
    /// each extracted fact's importance; extraction itself is unconditional.
    /// `created` counts every upsert, overwrites of identical content
    /// included. An empty batch reports `NothingToConsolidate` and writes
    /// no log. A log write failure is logged and never rolls back entries
    /// already stored.
    pub fn consolidate(
        &mut self,
        store: &mut LongTermStore,
        records: &[ConversationRecord],
    ) -> Result<ConsolidationReport> {
        if records.is_empty() {
            debug!("Consolidation skipped, nothing to consolidate");
            return Ok(ConsolidationReport::nothing_to_consolidate());
        }

        let mut created = 0;
        for record in records {
            let salience = self.scorer.score(record)?;
            let facts = extract_facts(record, salience);
            debug!(
                "Extracted {} fact(s) from conversation {} (salience {salience:.2})",
                facts.len(),
                record.id
            );
            for fact in facts {
                store.upsert(fact)?;
                created += 1;
            }
        }

        let report = ConsolidationReport::done(records.len(), created);
        self.write_log(&report);
        info!(
            "Consolidated {} conversations into {} entries",
            report.processed, report.created
        );
        Ok(report)
    }

    fn write_log(&mut self, report: &ConsolidationReport) {
        let log = ConsolidationLogRecord {
            timestamp: Utc::now(),
            processed: report.processed,
            created: report.created,
        };
        if let Err(e) = self.log_store.save(&utc_today(), &log) {
            warn!("Failed to write consolidation log: {e}");
        }
    }
}
