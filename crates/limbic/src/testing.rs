//! Test utilities for limbic - shared fixture builders
//!
//! Unit and integration tests build the same few shapes over and over:
//! a config rooted somewhere disposable and conversations from a fixed
//! provider/model pair. These helpers keep those literals in one place.

use std::path::Path;

use crate::config::Config;
use crate::types::{ConversationRecord, Message};

/// Provider used for fixture conversations
pub const TEST_PROVIDER: &str = "openai";

/// Model used for fixture conversations
pub const TEST_MODEL: &str = "gpt-4o";

/// A config whose data directory is `dir` instead of the user's home.
/// Point it at a tempdir to isolate a test's storage completely.
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.storage.data_dir = dir.to_path_buf();
    config
}

/// A conversation holding a single user message
pub fn user_conversation(text: &str) -> ConversationRecord {
    ConversationRecord::new(TEST_PROVIDER, TEST_MODEL, vec![Message::user(text)])
}

/// A conversation with explicit messages
pub fn conversation_with(messages: Vec<Message>) -> ConversationRecord {
    ConversationRecord::new(TEST_PROVIDER, TEST_MODEL, messages)
}
