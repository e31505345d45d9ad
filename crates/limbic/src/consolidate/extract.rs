//! Heuristic fact extraction from captured conversations
//!
//! User-authored statements are classified by signal phrases and turned
//! into content-addressed [`MemoryEntry`] values. Deterministic text
//! matching only; anything smarter belongs behind a future extractor.

use crate::types::{Category, ConversationRecord, MemoryEntry, Role};

/// Phrases marking a statement as being about who the user is
const IDENTITY_SIGNALS: [&str; 6] = [
    "my name is",
    "i am a",
    "i'm a",
    "i work at",
    "i work as",
    "i live in",
];

/// Phrases marking a statement as a taste or habit
const PREFERENCE_SIGNALS: [&str; 7] = [
    "i prefer",
    "i like",
    "i love",
    "i hate",
    "i use",
    "my favorite",
    "i always",
];

/// Statements shorter than this (after trimming) carry no extractable fact
const MIN_FACT_CHARS: usize = 10;

/// Classify a statement by first-match priority: identity signals win over
/// preference signals, and anything unsignalled is knowledge.
pub fn classify(text: &str) -> Category {
    let lower = text.to_lowercase();
    if IDENTITY_SIGNALS.iter().any(|signal| lower.contains(*signal)) {
        Category::Identity
    } else if PREFERENCE_SIGNALS.iter().any(|signal| lower.contains(*signal)) {
        Category::Preference
    } else {
        Category::Knowledge
    }
}

/// Extract durable facts from one conversation.
///
/// Only user messages are considered; each is trimmed and dropped when
/// shorter than [`MIN_FACT_CHARS`]. Every fact carries the conversation's
/// salience as its importance, `"<provider>:<model>"` as its source, and
/// the provider as a tag.
pub fn extract_facts(record: &ConversationRecord, importance: f32) -> Vec<MemoryEntry> {
    let source = format!("{}:{}", record.provider, record.model);
    let mut facts = Vec::new();
    for message in &record.messages {
        if message.role != Role::User {
            continue;
        }
        let text = message.content.trim();
        if text.chars().count() < MIN_FACT_CHARS {
            continue;
        }
        facts.push(MemoryEntry::from_content(
            text,
            classify(text),
            &source,
            vec![record.provider.clone()],
            importance,
        ));
    }
    facts
}
