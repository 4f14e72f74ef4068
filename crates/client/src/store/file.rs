//! File-backed key-value store.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use super::{KvStore, StoreError};

/// A `KvStore` persisted as a single JSON file of key-to-string mappings.
///
/// The whole map is loaded at open and rewritten on every mutation, which is
/// fine at the scale of one user profile's worth of data. A corrupt or
/// unreadable file is treated as empty rather than an error; the first write
/// then replaces it.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store at `path`, creating parent directories as needed.
    ///
    /// A missing file yields an empty store. A file that exists but cannot
    /// be parsed is logged and treated as empty.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the parent directory cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let entries = Self::load(&path);
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// The path this store persists to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> HashMap<String, String> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Could not read store file, starting empty");
                return HashMap::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Store file is corrupt, starting empty");
                HashMap::new()
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.lock();
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }
}
