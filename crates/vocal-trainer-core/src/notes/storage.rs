//! String key/value persistence for note collections.

use crate::{CoreError, CoreResult};

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Minimal string key/value store, in the manner of browser local storage.
pub trait KeyValueStore {
    /// Value stored under `key`.
    fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String) -> CoreResult<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> CoreResult<()>;
}

/// Volatile store, for tests and for running without a data directory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> CoreResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> CoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// The whole map is kept in memory and rewritten on every change using a
/// temp file and rename, so a crash mid-write leaves the previous file
/// intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    #[track_caller]
    #[instrument]
    pub fn open(path: &Path) -> CoreResult<Self> {
        let entries = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| CoreError::StorageError {
                reason: format!("Failed to read {:?}: {}", path, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            serde_json::from_str(&contents).map_err(|e| CoreError::StorageError {
                reason: format!("Failed to parse {:?}: {}", path, e),
                location: ErrorLocation::from(Location::caller()),
            })?
        } else {
            BTreeMap::new()
        };

        info!(path = ?path, keys = entries.len(), "Notes storage opened");

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[track_caller]
    fn persist(&self) -> CoreResult<()> {
        let storage_error = |what: &str, e: &dyn std::fmt::Display| CoreError::StorageError {
            reason: format!("{}: {}", what, e),
            location: ErrorLocation::from(Location::caller()),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| storage_error("Failed to create notes directory", &e))?;
        }

        let contents = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| storage_error("Failed to serialize notes", &e))?;

        let temp_path = self.path.with_extension("json.tmp");

        let mut temp_file = fs::File::create(&temp_path)
            .map_err(|e| storage_error("Failed to create temp notes file", &e))?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| storage_error("Failed to write temp notes file", &e))?;

        temp_file
            .sync_all()
            .map_err(|e| storage_error("Failed to sync temp notes file", &e))?;

        fs::rename(&temp_path, &self.path)
            .map_err(|e| storage_error("Failed to rename temp notes file", &e))?;

        debug!(path = ?self.path, keys = self.entries.len(), "Notes persisted");

        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> CoreResult<()> {
        self.entries.insert(key.to_string(), value);
        self.persist()
    }

    fn remove(&mut self, key: &str) -> CoreResult<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
