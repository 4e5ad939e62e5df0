//! File-backed store
//!
//! All slots live in a single `storage.json` object inside the state
//! directory. The whole map is cached in memory and rewritten on every
//! mutation through a temporary file followed by a rename, so a crash never
//! leaves a half-written store behind.

use super::{KeyValueStore, StorageError, StorageResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Name of the backing file inside the state directory
pub const STORE_FILE_NAME: &str = "storage.json";

/// Durable store persisted as a JSON object of strings
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    slots: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or create) the store inside `dir`
    pub fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(STORE_FILE_NAME);

        let slots = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| StorageError::Corruption {
                    path: path.clone(),
                    error: e.to_string(),
                })?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = ?path, slots = slots.len(), "Opened durable store");

        Ok(Self {
            path,
            slots: Mutex::new(slots),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    fn persist(&self, slots: &BTreeMap<String, String>) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(slots)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut slots = self.lock()?;
        slots.insert(key.to_string(), value.to_string());
        self.persist(&slots)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut slots = self.lock()?;
        if slots.remove(key).is_some() {
            self.persist(&slots)?;
        }
        Ok(())
    }
}
