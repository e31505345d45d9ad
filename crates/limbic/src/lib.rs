//! Limbic - Layered personal memory for LLM applications
//!
//! This crate captures raw conversation records into an episodic log,
//! scores their personal salience, consolidates them into deduplicated
//! durable facts, and serves those facts back through category listing
//! and relevance search. [`MemorySystem`] is the facade callers use.

pub mod config;
pub mod consolidate;
pub mod episodic;
pub mod error;
pub mod retrieval;
pub mod salience;
pub mod storage;
pub mod system;
pub mod testing;
pub mod types;

pub use config::{Config, RetrievalStrategy};
pub use error::{LimbicError, Result};
pub use system::MemorySystem;
pub use types::{
    Category, ConsolidationReport, ConsolidationStatus, ContextSnapshot, ConversationRecord,
    DailyLog, MemoryEntry, Message, Role, SearchResult, SystemStatus,
};
