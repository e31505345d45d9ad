//! Append-only episodic log of captured conversations
//!
//! Records are partitioned by UTC calendar day, one `DailyLog` JSON file per
//! day. Appending loads the current day's partition, pushes the record, and
//! rewrites the file; nothing else ever mutates a partition. Registered
//! observers are told about each capture after it is durable.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{LimbicError, Result};
use crate::storage::ContentStore;
use crate::types::{ConversationRecord, DATE_FORMAT, DailyLog, utc_today};

/// Notified synchronously after each capture, in registration order.
///
/// Observer failures are logged and swallowed; capture durability never
/// depends on observer health.
pub trait CaptureObserver: Send + Sync {
    fn on_capture(&self, record: &ConversationRecord) -> Result<()>;
}

/// Day-partitioned, append-only conversation log
pub struct EpisodicLog {
    store: ContentStore,
    observers: Vec<Arc<dyn CaptureObserver>>,
}

impl EpisodicLog {
    /// Open the log rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            store: ContentStore::open(dir)?,
            observers: Vec::new(),
        })
    }

    /// Register an observer; it will see every subsequent capture once
    pub fn register_observer(&mut self, observer: Arc<dyn CaptureObserver>) {
        self.observers.push(observer);
    }

    /// Append a record to today's partition and notify observers.
    ///
    /// Returns the record's id. The write happens before any observer runs,
    /// and an observer error is logged at `warn` and discarded.
    pub fn append(&mut self, record: ConversationRecord) -> Result<String> {
        let today = utc_today();
        let mut log = match self.store.load::<DailyLog>(&today) {
            Ok(Some(log)) => log,
            Ok(None) => DailyLog::new(&today),
            Err(LimbicError::Serialization(reason)) => {
                warn!("Replacing corrupt episodic partition {today}: {reason}");
                DailyLog::new(&today)
            }
            Err(e) => return Err(e),
        };

        let id = record.id.clone();
        log.records.push(record);
        self.store.save(&today, &log)?;
        debug!("Captured conversation {id} into partition {today}");

        // The record slot we just pushed; observers get a borrow of it
        if let Some(record) = log.records.last() {
            for observer in &self.observers {
                if let Err(e) = observer.on_capture(record) {
                    warn!("Capture observer failed for record {id}: {e}");
                }
            }
        }

        Ok(id)
    }

    /// Find a record by id, scanning partitions newest-first
    pub fn fetch(&self, id: &str) -> Result<Option<ConversationRecord>> {
        for day in self.day_keys()?.into_iter().rev() {
            if let Some(log) = self.read_partition(&day)? {
                if let Some(record) = log.records.into_iter().find(|r| r.id == id) {
                    return Ok(Some(record));
                }
            }
        }
        Ok(None)
    }

    /// Up to `n` records, newest first, crossing day boundaries as needed
    pub fn recent(&self, n: usize) -> Result<Vec<ConversationRecord>> {
        let mut records = Vec::new();
        for day in self.day_keys()?.into_iter().rev() {
            if records.len() >= n {
                break;
            }
            if let Some(log) = self.read_partition(&day)? {
                // Within a partition, stored order is oldest-first
                for record in log.records.into_iter().rev() {
                    if records.len() >= n {
                        break;
                    }
                    records.push(record);
                }
            }
        }
        Ok(records)
    }

    /// Every record captured during the current UTC day, oldest first
    pub fn all_for_today(&self) -> Result<Vec<ConversationRecord>> {
        let today = utc_today();
        Ok(self
            .read_partition(&today)?
            .map(|log| log.records)
            .unwrap_or_default())
    }

    /// Total records across all partitions
    pub fn count(&self) -> Result<usize> {
        let mut total = 0;
        for day in self.day_keys()? {
            if let Some(log) = self.read_partition(&day)? {
                total += log.records.len();
            }
        }
        Ok(total)
    }

    /// Partition names that parse as dates, sorted ascending.
    ///
    /// `YYYY-MM-DD` sorts lexicographically in chronological order, so the
    /// store's sorted listing is already oldest-first.
    fn day_keys(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .filter(|name| NaiveDate::parse_from_str(name, DATE_FORMAT).is_ok())
            .collect())
    }

    /// Load one partition, skipping it (with a warning) when unparsable
    fn read_partition(&self, day: &str) -> Result<Option<DailyLog>> {
        match self.store.load::<DailyLog>(day) {
            Ok(log) => Ok(log),
            Err(LimbicError::Serialization(reason)) => {
                warn!("Skipping corrupt episodic partition {day}: {reason}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
