//! File-backed preference store.
//!
//! Entries live in a single JSON object of string keys to string values:
//!
//! ```json
//! {"theme": "dark"}
//! ```
//!
//! The file is read on every access and rewritten on every change, so
//! several processes sharing the file see each other's writes. A missing
//! file is an empty store.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::env::PreferenceStore;
use crate::error::UmbraError;

/// File name used under the data directory.
pub const STORE_FILE_NAME: &str = "preferences.json";

/// A [`PreferenceStore`] persisted as a JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, UmbraError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(UmbraError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|source| UmbraError::CorruptStore {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), UmbraError> {
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent,
            None => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| UmbraError::io(parent, e))?;

        let mut content = serde_json::to_string_pretty(entries)?;
        content.push('\n');

        // Unique temp file in the same directory, renamed over the store.
        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| UmbraError::io(parent, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| UmbraError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| UmbraError::io(&self.path, e.error))?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, UmbraError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), UmbraError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)?;
        tracing::debug!(path = %self.path.display(), key, "stored preference");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), UmbraError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.save(&entries)?;
        tracing::debug!(path = %self.path.display(), key, "removed preference");
        Ok(())
    }
}
