//! Core data model for the Limbic memory system
//!
//! Defines the records flowing through the capture/consolidation pipeline
//! and the durable entries held in long-term storage.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Date format shared by all day-partitioned files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Current UTC calendar day, formatted `YYYY-MM-DD`.
pub fn utc_today() -> String {
    Utc::now().format(DATE_FORMAT).to_string()
}

/// Who authored a message within a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single immutable message within a captured conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message author
    pub role: Role,
    /// Message text
    pub content: String,
}

impl Message {
    /// Create a user-authored message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant-authored message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// A raw captured interaction. Created once by capture, read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Unique identifier for this conversation
    pub id: String,
    /// Upstream provider the conversation came from (e.g. "openai")
    pub provider: String,
    /// Model that produced the assistant turns
    pub model: String,
    /// Ordered message sequence
    pub messages: Vec<Message>,
    /// When the conversation was captured
    pub timestamp: DateTime<Utc>,
    /// Open mapping for producer-specific extras
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ConversationRecord {
    /// Create a new record with a fresh id and the current timestamp
    pub fn new(
        provider: impl Into<String>,
        model: impl Into<String>,
        messages: Vec<Message>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            provider: provider.into(),
            model: model.into(),
            messages,
            timestamp: Utc::now(),
            metadata: serde_json::Map::new(),
        }
    }
}

/// One UTC day's worth of captured conversations.
///
/// Mutated only by appending a record and rewriting the whole file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLog {
    /// Calendar day this partition covers (`YYYY-MM-DD`, UTC)
    pub date: String,
    /// Records in capture order, oldest first
    #[serde(default)]
    pub records: Vec<ConversationRecord>,
}

impl DailyLog {
    /// Create an empty partition for the given day
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            records: Vec::new(),
        }
    }
}

/// Classification of a long-term memory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Who the user is (name, employer, location)
    Identity,
    /// What the user likes, dislikes, and habitually reaches for
    Preference,
    /// Declarative facts with no personal signal
    Knowledge,
    /// Anything else, typically manual notes
    General,
}

impl Category {
    /// Lowercase name used on disk and in search tokens
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Identity => "identity",
            Category::Preference => "preference",
            Category::Knowledge => "knowledge",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A durable fact held in the long-term store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Content-addressed identifier (see [`MemoryEntry::content_id`])
    pub id: String,
    /// The fact itself, whitespace-trimmed
    pub content: String,
    /// Classification used for partitioning and filtering
    pub category: Category,
    /// Where the fact came from (`"<provider>:<model>"` or `"manual"`)
    pub source: String,
    /// Free-form labels, deduplicated
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Importance weight in [0, 1]
    pub importance: f32,
    /// When the entry was (last) created
    pub timestamp: DateTime<Utc>,
}

impl MemoryEntry {
    /// Content-addressed identifier: lowercase hex SHA-256 of the
    /// whitespace-trimmed content.
    ///
    /// Only surrounding whitespace is normalized; case and punctuation are
    /// hashed as-is, so "My name is Alex." and "my name is alex." remain
    /// distinct entries. Identical content yields the identical id no matter
    /// which conversation produced it.
    pub fn content_id(content: &str) -> String {
        hex::encode(Sha256::digest(content.trim().as_bytes()))
    }

    /// Create an entry whose id is derived from its content.
    ///
    /// This constructor is the single place the content-addressing invariant
    /// lives; every stored entry goes through it. Importance is clamped to
    /// [0, 1].
    pub fn from_content(
        content: &str,
        category: Category,
        source: &str,
        tags: Vec<String>,
        importance: f32,
    ) -> Self {
        let content = content.trim().to_string();
        Self {
            id: Self::content_id(&content),
            content,
            category,
            source: source.to_string(),
            tags: tags.into_iter().collect(),
            importance: importance.clamp(0.0, 1.0),
            timestamp: Utc::now(),
        }
    }
}

/// A scored search hit. Ephemeral, never persisted.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matching entry
    pub entry: MemoryEntry,
    /// Backend-specific relevance score
    pub score: f32,
}

/// Read-only snapshot of everything the system currently knows
#[derive(Debug, Clone, Serialize)]
pub struct ContextSnapshot {
    /// Contents of identity entries
    pub identity: Vec<String>,
    /// Contents of preference entries
    pub preferences: Vec<String>,
    /// Contents of knowledge and other entries
    pub knowledge: Vec<String>,
    /// How many recent conversations were considered
    pub recent_conversations: usize,
    /// Total entries in the long-term store
    pub total_memories: usize,
    /// Total conversations in the episodic log
    pub total_conversations: usize,
}

/// Observability counters plus the storage location
#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    /// Conversations captured across all day partitions
    pub conversations_captured: usize,
    /// Entries across all long-term partitions
    pub memories_stored: usize,
    /// Base directory holding every partition
    pub data_dir: PathBuf,
}

/// Outcome of a consolidation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidationReport {
    /// Whether the run had anything to do
    pub status: ConsolidationStatus,
    /// Conversations examined
    pub processed: usize,
    /// Entries upserted (overwrites of identical content included)
    pub created: usize,
}

impl ConsolidationReport {
    /// Report for a run over an empty input batch
    pub fn nothing_to_consolidate() -> Self {
        Self {
            status: ConsolidationStatus::NothingToConsolidate,
            processed: 0,
            created: 0,
        }
    }

    /// Report for a completed run
    pub fn done(processed: usize, created: usize) -> Self {
        Self {
            status: ConsolidationStatus::Done,
            processed,
            created,
        }
    }
}

/// Consolidation run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidationStatus {
    /// Facts were extracted and stored
    Done,
    /// The input batch was empty
    NothingToConsolidate,
}
