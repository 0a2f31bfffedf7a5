//! Key-value save stores.
//!
//! The game persists one blob under one key. [`SaveStore`] abstracts where
//! that blob lives: [`FileSaveStore`] keeps it on disk as `<dir>/<key>.json`,
//! [`MemorySaveStore`] keeps it in a map for tests and embedding.

use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ascendance_types::GameState;
use tempfile::NamedTempFile;

use crate::blob;
use crate::error::SaveError;

/// A place a save blob can be stored under a key.
pub trait SaveStore {
    /// Read the blob at `key`, or `None` if nothing was saved.
    fn load(&self, key: &str) -> Result<Option<String>, SaveError>;

    /// Replace the blob at `key`.
    fn save(&self, key: &str, blob: &str) -> Result<(), SaveError>;

    /// Delete the blob at `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> Result<(), SaveError>;
}

/// Load and revive the game state saved under `key`.
pub fn load_state(store: &impl SaveStore, key: &str) -> Result<Option<GameState>, SaveError> {
    store
        .load(key)?
        .map(|contents| blob::decode(&contents))
        .transpose()
}

/// Encode `state` and save it under `key`.
pub fn save_state(store: &impl SaveStore, key: &str, state: &GameState) -> Result<(), SaveError> {
    let contents = blob::encode(state)?;
    store.save(key, &contents)
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// Saves each key as a JSON file in one directory.
///
/// Writes go to a named temporary file in the same directory which is then
/// persisted over the target, so a crash mid-write never leaves a truncated
/// save behind.
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    directory: PathBuf,
}

impl FileSaveStore {
    /// A store rooted at `directory`. The directory is created on first save.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The directory holding the save files.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The file a key is stored in.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, SaveError> {
        validate_key(key)?;
        Ok(self.directory.join(format!("{key}.json")))
    }
}

impl SaveStore for FileSaveStore {
    fn load(&self, key: &str) -> Result<Option<String>, SaveError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), SaveError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.directory)?;
        let mut temp = NamedTempFile::new_in(&self.directory)?;
        temp.write_all(blob.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| SaveError::Io(e.error))?;
        tracing::trace!(path = %path.display(), bytes = blob.len(), "Save written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SaveError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Save removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<(), SaveError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SaveError::InvalidKey(key.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Memory store
// ---------------------------------------------------------------------------

/// Keeps blobs in memory.
#[derive(Debug, Default)]
pub struct MemorySaveStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySaveStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> Result<T, SaveError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| SaveError::Unavailable(e.to_string()))?;
        Ok(f(&mut entries))
    }
}

impl SaveStore for MemorySaveStore {
    fn load(&self, key: &str) -> Result<Option<String>, SaveError> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), SaveError> {
        self.with_entries(|entries| {
            entries.insert(key.to_owned(), blob.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), SaveError> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }
}
