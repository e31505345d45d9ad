//! Directory-backed JSON document store
//!
//! One record per file, named `<name>.json`, written whole on every save.
//! Every persisted collection in Limbic (episodic partitions, salience
//! cache, long-term entries, consolidation logs) sits on top of this.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{LimbicError, Result};

/// A flat directory of JSON documents keyed by name
#[derive(Debug, Clone)]
pub struct ContentStore {
    dir: PathBuf,
}

impl ContentStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory this store reads and writes
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute path a given name maps to
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Whether a document with this name exists on disk
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Serialize `value` and write it under `name`, replacing any
    /// previous document with the same name.
    ///
    /// Takes `&mut self`: a partition has exactly one owning handle, and
    /// write access flows through it.
    pub fn save<T: Serialize>(&mut self, name: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| LimbicError::Serialization(format!("failed to serialize {name}: {e}")))?;
        fs::write(self.path_for(name), json)?;
        Ok(())
    }

    /// Load the document stored under `name`.
    ///
    /// A missing file is `Ok(None)`; a file that exists but does not parse
    /// is a `Serialization` error so callers can decide whether to skip it.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.path_for(name);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = serde_json::from_str(&json).map_err(|e| {
            LimbicError::Serialization(format!("failed to parse {}: {e}", path.display()))
        })?;
        Ok(Some(value))
    }

    /// Remove the document stored under `name`.
    ///
    /// Returns whether a document was actually removed.
    pub fn delete(&mut self, name: &str) -> Result<bool> {
        match fs::remove_file(self.path_for(name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Names of all documents in this store, sorted.
    ///
    /// Only immediate `.json` files count; subdirectories are someone
    /// else's store and are not descended into.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        value: u32,
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = ContentStore::open(dir.path().join("docs")).expect("Failed to open store");

        store.save("one", &Doc { value: 1 }).expect("Failed to save");
        let loaded: Option<Doc> = store.load("one").expect("Failed to load");
        assert_eq!(loaded, Some(Doc { value: 1 }));
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = ContentStore::open(dir.path()).expect("Failed to open store");

        let loaded: Option<Doc> = store.load("absent").expect("Failed to load");
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_corrupt_is_serialization_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = ContentStore::open(dir.path()).expect("Failed to open store");
        std::fs::write(store.path_for("bad"), "{not json").expect("Failed to write");

        let err = store.load::<Doc>("bad").unwrap_err();
        assert!(matches!(err, LimbicError::Serialization(_)));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = ContentStore::open(dir.path()).expect("Failed to open store");

        store.save("doc", &Doc { value: 1 }).expect("Failed to save");
        store.save("doc", &Doc { value: 2 }).expect("Failed to save");

        let loaded: Option<Doc> = store.load("doc").expect("Failed to load");
        assert_eq!(loaded, Some(Doc { value: 2 }));
    }

    #[test]
    fn test_delete_reports_whether_removed() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = ContentStore::open(dir.path()).expect("Failed to open store");

        store.save("doc", &Doc { value: 1 }).expect("Failed to save");
        assert!(store.delete("doc").expect("Failed to delete"));
        assert!(!store.delete("doc").expect("Failed to delete"));
        assert!(!store.exists("doc"));
    }

    #[test]
    fn test_list_is_sorted_and_skips_non_json() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = ContentStore::open(dir.path()).expect("Failed to open store");

        store.save("b", &Doc { value: 2 }).expect("Failed to save");
        store.save("a", &Doc { value: 1 }).expect("Failed to save");
        std::fs::write(dir.path().join("notes.txt"), "ignored").expect("Failed to write");
        std::fs::create_dir(dir.path().join("nested")).expect("Failed to create dir");
        std::fs::write(dir.path().join("nested").join("c.json"), "{}").expect("Failed to write");

        assert_eq!(store.list().expect("Failed to list"), vec!["a", "b"]);
    }
}
