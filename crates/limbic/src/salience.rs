//! Importance scoring for captured conversations
//!
//! Salience is a deterministic function of message text: conversations that
//! sound personal (names, preferences, standing instructions) score higher
//! than small talk. Scores are advisory weights, never admission filters;
//! consolidation stores every extracted fact and records the salience as its
//! importance.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::episodic::CaptureObserver;
use crate::error::{LimbicError, Result};
use crate::storage::ContentStore;
use crate::types::ConversationRecord;

/// Phrases that mark a conversation as personally significant. Each hit
/// counts once regardless of how often it occurs.
const SALIENCE_KEYWORDS: [&str; 20] = [
    "my name is",
    "i am",
    "i'm",
    "i prefer",
    "i like",
    "i love",
    "i hate",
    "i use",
    "my favorite",
    "i work",
    "i live",
    "always",
    "never",
    "important",
    "remember",
    "don't forget",
    "i want",
    "i need",
    "birthday",
    "email",
];

/// Reported for conversations that were never scored
const DEFAULT_SCORE: f32 = 0.5;

/// Cache document name under the salience directory
const SCORE_FILE: &str = "salience";

/// Deterministic importance scorer with a persisted per-conversation cache.
///
/// Registered as a capture observer so every captured conversation is scored
/// at capture time; consolidation rescores the same records harmlessly (same
/// input, same score). The cache store sits behind a mutex: one scorer is
/// shared (`Arc`) between the episodic log and the consolidator.
pub struct SalienceScorer {
    store: Mutex<ContentStore>,
}

impl SalienceScorer {
    /// Open the scorer with its cache rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            store: Mutex::new(ContentStore::open(dir)?),
        })
    }

    /// The pure scoring function: base 0.3, +0.1 per distinct keyword hit
    /// (capped at 1.0), plus 0.02 per message capped at +0.2, clamped to
    /// [0, 1]. All message roles contribute text.
    pub fn compute_salience(record: &ConversationRecord) -> f32 {
        let text = record
            .messages
            .iter()
            .map(|m| m.content.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");

        let hits = SALIENCE_KEYWORDS
            .iter()
            .filter(|kw| text.contains(*kw))
            .count();
        let importance = (0.3 + hits as f32 * 0.1).min(1.0);
        let length_bonus = (record.messages.len() as f32 * 0.02).min(0.2);
        (importance + length_bonus).clamp(0.0, 1.0)
    }

    /// Score a conversation and persist the result keyed by its id.
    ///
    /// Rescoring overwrites. A corrupt cache file is replaced (logged);
    /// a cache write failure propagates.
    pub fn score(&self, record: &ConversationRecord) -> Result<f32> {
        let value = Self::compute_salience(record);

        let mut store = self
            .store
            .lock()
            .map_err(|_| LimbicError::Storage("salience cache lock poisoned".to_string()))?;
        let mut scores = match store.load::<BTreeMap<String, f32>>(SCORE_FILE) {
            Ok(Some(scores)) => scores,
            Ok(None) => BTreeMap::new(),
            Err(LimbicError::Serialization(reason)) => {
                warn!("Replacing corrupt salience cache: {reason}");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        scores.insert(record.id.clone(), value);
        store.save(SCORE_FILE, &scores)?;

        debug!("Scored conversation {} at {value:.2}", record.id);
        Ok(value)
    }

    /// Cached score for a conversation, or 0.5 if it was never scored.
    ///
    /// A missing or unreadable cache also reports 0.5; lookups never fail.
    pub fn get_score(&self, id: &str) -> f32 {
        let Ok(store) = self.store.lock() else {
            return DEFAULT_SCORE;
        };
        match store.load::<BTreeMap<String, f32>>(SCORE_FILE) {
            Ok(Some(scores)) => scores.get(id).copied().unwrap_or(DEFAULT_SCORE),
            Ok(None) => DEFAULT_SCORE,
            Err(e) => {
                warn!("Salience cache unreadable, reporting default: {e}");
                DEFAULT_SCORE
            }
        }
    }
}

impl CaptureObserver for SalienceScorer {
    fn on_capture(&self, record: &ConversationRecord) -> Result<()> {
        self.score(record).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    fn record(messages: Vec<Message>) -> ConversationRecord {
        ConversationRecord::new("openai", "gpt-4o", messages)
    }

    #[test]
    fn test_no_keywords_scores_base_plus_length() {
        let record = record(vec![Message::user("what's the weather today")]);
        let score = SalienceScorer::compute_salience(&record);
        assert!((score - 0.32).abs() < 1e-6, "got {score}");
    }

    #[test]
    fn test_keyword_hits_are_distinct() {
        // "i love" occurs twice but counts once; "i live" counts once
        let record = record(vec![Message::user(
            "I live in Berlin and I love Go and I love Rust",
        )]);
        let score = SalienceScorer::compute_salience(&record);
        assert!((score - 0.52).abs() < 1e-6, "got {score}");
    }

    #[test]
    fn test_length_bonus_caps_at_twenty_messages() {
        let many: Vec<Message> = (0..30).map(|i| Message::user(format!("msg {i}"))).collect();
        let score = SalienceScorer::compute_salience(&record(many));
        assert!((score - 0.5).abs() < 1e-6, "got {score}");
    }

    #[test]
    fn test_score_never_exceeds_one() {
        let loaded = record(vec![Message::user(
            "my name is Alex, I am a fan, I'm sure, I prefer tea, I like coffee, \
             I love hiking, I hate rain, I use vim, my favorite color, I work remotely, \
             I live here, always remember my birthday and email, never forget, important",
        )]);
        let score = SalienceScorer::compute_salience(&loaded);
        assert!((0.0..=1.0).contains(&score));
        assert!((score - 1.0).abs() < 1e-6, "got {score}");
    }

    #[test]
    fn test_assistant_text_counts_too() {
        let record = record(vec![
            Message::user("tell me something"),
            Message::assistant("always remember this"),
        ]);
        let score = SalienceScorer::compute_salience(&record);
        // two keywords + two messages
        assert!((score - 0.54).abs() < 1e-6, "got {score}");
    }

    #[test]
    fn test_score_persists_and_get_score_reads_back() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let scorer = SalienceScorer::open(dir.path()).expect("Failed to open scorer");
        let record = record(vec![Message::user("I live in Berlin and I love Go")]);

        let scored = scorer.score(&record).expect("Failed to score");
        assert!((scored - 0.52).abs() < 1e-6);
        assert!((scorer.get_score(&record.id) - 0.52).abs() < 1e-6);
        assert!(dir.path().join("salience.json").is_file());
    }

    #[test]
    fn test_get_score_defaults_when_never_scored() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let scorer = SalienceScorer::open(dir.path()).expect("Failed to open scorer");
        assert!((scorer.get_score("unknown") - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_corrupt_cache_replaced_on_score() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let scorer = SalienceScorer::open(dir.path()).expect("Failed to open scorer");
        std::fs::write(dir.path().join("salience.json"), "{broken").expect("Failed to write");

        let record = record(vec![Message::user("I live in Berlin and I love Go")]);
        scorer.score(&record).expect("Failed to score");
        assert!((scorer.get_score(&record.id) - 0.52).abs() < 1e-6);
    }

    #[test]
    fn test_rescoring_overwrites() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let scorer = SalienceScorer::open(dir.path()).expect("Failed to open scorer");
        let record = record(vec![Message::user("I live in Berlin and I love Go")]);

        scorer.score(&record).expect("Failed to score");
        scorer.score(&record).expect("Failed to score");

        let cache: BTreeMap<String, f32> = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("salience.json")).expect("Failed to read"),
        )
        .expect("Failed to parse");
        assert_eq!(cache.len(), 1);
    }
}
