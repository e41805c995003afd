//! Scoped key-value store.
//!
//! The local backend keeps each serialized snapshot under a fixed string key,
//! the way a browser keeps values in local storage. `FileKeyValueStore` maps
//! every key to one atomically written file inside a scope directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use journal_core::error::{JournalError, Result};

use super::atomic_file::AtomicFile;

/// Transformation applied by [`KeyValueStore::update`].
pub type UpdateFn = Box<dyn FnOnce(Option<String>) -> Result<String> + Send>;

/// String values under string keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value for `key`, or `None` if it was never set.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Read-modify-write of one key, isolated from concurrent updates.
    async fn update(&self, key: &str, f: UpdateFn) -> Result<()>;
}

/// File-backed store: `<scope_dir>/<key>.json` per key.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    scope_dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(scope_dir: impl Into<PathBuf>) -> Self {
        Self {
            scope_dir: scope_dir.into(),
        }
    }

    pub fn scope_dir(&self) -> &Path {
        &self.scope_dir
    }

    fn file_for(&self, key: &str) -> Result<AtomicFile> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(JournalError::data_access(format!(
                "invalid storage key '{}'",
                key
            )));
        }
        Ok(AtomicFile::new(self.scope_dir.join(format!("{key}.json"))))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file = self.file_for(key)?;
        tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| JournalError::internal(format!("Failed to join task: {}", e)))?
    }

    async fn update(&self, key: &str, f: UpdateFn) -> Result<()> {
        let file = self.file_for(key)?;
        tokio::task::spawn_blocking(move || file.update(f))
            .await
            .map_err(|e| JournalError::internal(format!("Failed to join task: {}", e)))?
    }
}
