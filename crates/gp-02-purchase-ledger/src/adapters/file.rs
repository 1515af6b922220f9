//! File-backed key-value store.

use crate::domain::errors::StorageFault;
use crate::ports::outbound::KeyValueStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Persists all keys as one JSON object on disk.
///
/// Every write rewrites the file through a temp file and rename, so a crash
/// leaves either the old or the new contents.
pub struct FileBackedKVStore {
    data: RwLock<HashMap<String, String>>,
    path: PathBuf,
}

impl FileBackedKVStore {
    /// Open the store at `path`, loading existing contents when present.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let data = Self::load_from_file(&path);

        if data.is_empty() {
            tracing::info!("[gp-02] No existing storage at {}", path.display());
        } else {
            tracing::info!("[gp-02] Loaded {} keys from {}", data.len(), path.display());
        }

        Self {
            data: RwLock::new(data),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_file(path: &Path) -> HashMap<String, String> {
        let Ok(bytes) = std::fs::read(path) else {
            return HashMap::new();
        };

        match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(
                    "[gp-02] Storage file {} unreadable, starting empty: {}",
                    path.display(),
                    e
                );
                HashMap::new()
            }
        }
    }

    fn save_to_file(&self, data: &HashMap<String, String>) -> Result<(), StorageFault> {
        let io = |e: std::io::Error| StorageFault::Io {
            message: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io)?;
            }
        }

        let bytes = serde_json::to_vec(data).map_err(|e| StorageFault::Io {
            message: e.to_string(),
        })?;

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, &bytes).map_err(io)?;
        std::fs::rename(&temp_path, &self.path).map_err(io)?;

        Ok(())
    }
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageFault> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageFault> {
        let mut data = self.data.write();
        let previous = data.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save_to_file(&data) {
            // Keep memory consistent with disk
            match previous {
                Some(old) => data.insert(key.to_string(), old),
                None => data.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageFault> {
        let mut data = self.data.write();
        let Some(previous) = data.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.save_to_file(&data) {
            data.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}
