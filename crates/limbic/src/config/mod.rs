//! Configuration for the Limbic memory system
//!
//! Paths and retrieval settings. Every persisted partition lives under
//! `storage.data_dir`, one subdirectory per concern.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{LimbicError, Result};

/// Main configuration structure for Limbic
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Storage location configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Search backend configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl Config {
    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| LimbicError::Config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Directory holding the day-partitioned episodic log.
    pub fn episodic_dir(&self) -> PathBuf {
        self.storage.data_dir.join("episodic")
    }

    /// Directory holding the salience score cache.
    pub fn salience_dir(&self) -> PathBuf {
        self.storage.data_dir.join("salience")
    }

    /// Directory holding consolidated long-term memory entries.
    pub fn long_term_dir(&self) -> PathBuf {
        self.storage.data_dir.join("memories")
    }

    /// Directory holding per-day consolidation run logs.
    pub fn consolidation_dir(&self) -> PathBuf {
        self.storage.data_dir.join("consolidation")
    }
}

/// Storage location configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Base directory for all persisted partitions
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".limbic"))
        .unwrap_or_else(|| PathBuf::from(".limbic"))
}

/// Search backend configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RetrievalConfig {
    /// Strategy used to rank entries for `search`
    #[serde(default)]
    pub strategy: RetrievalStrategy,
}

/// Which search backend to construct when opening the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalStrategy {
    /// Token-overlap scoring against entry content, tags, and category
    #[default]
    Lexical,
    /// Embedding cosine similarity between query and entry content
    Similarity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.storage.data_dir.ends_with(".limbic"));
        assert_eq!(config.retrieval.strategy, RetrievalStrategy::Lexical);
    }

    #[test]
    fn test_partition_dirs_live_under_data_dir() {
        let config = Config {
            storage: StorageConfig {
                data_dir: PathBuf::from("/tmp/limbic-test"),
            },
            retrieval: RetrievalConfig::default(),
        };

        assert_eq!(config.episodic_dir(), Path::new("/tmp/limbic-test/episodic"));
        assert_eq!(config.salience_dir(), Path::new("/tmp/limbic-test/salience"));
        assert_eq!(config.long_term_dir(), Path::new("/tmp/limbic-test/memories"));
        assert_eq!(
            config.consolidation_dir(),
            Path::new("/tmp/limbic-test/consolidation")
        );
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
[storage]
data_dir = "/tmp/limbic"

[retrieval]
strategy = "similarity"
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to parse TOML");

        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/limbic"));
        assert_eq!(config.retrieval.strategy, RetrievalStrategy::Similarity);
    }

    #[test]
    fn test_toml_partial_deserialization() {
        // Only one section provided; the rest falls back to defaults
        let toml_str = r#"
[storage]
data_dir = "/tmp/partial"
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to parse partial TOML");

        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/partial"));
        assert_eq!(config.retrieval.strategy, RetrievalStrategy::Lexical);
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let toml_str = r#"
[retrieval]
strategy = "telepathy"
"#;

        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("limbic.toml");
        std::fs::write(&path, "[storage]\ndata_dir = \"/tmp/from-file\"\n")
            .expect("Failed to write config");

        let config = Config::load(&path).expect("Failed to load config");
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/from-file"));
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("limbic.toml");
        std::fs::write(&path, "storage = not toml").expect("Failed to write config");

        assert!(matches!(
            Config::load(&path),
            Err(LimbicError::Config(_))
        ));
    }
}
