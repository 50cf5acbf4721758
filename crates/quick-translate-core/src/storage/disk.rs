use sled::Db;
use std::path::Path;
use tracing::debug;

use super::KeyValueStore;
use crate::error::{Error, Result};

/// Disk-backed store using sled
pub struct DiskStore {
    db: Db,
}

impl DiskStore {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Persistence(format!(
                    "Failed to create storage directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let db = sled::open(path).map_err(|e| {
            let err_str = e.to_string();
            // Detect lock errors and provide actionable fix
            if err_str.contains("WouldBlock") || err_str.contains("lock") {
                Error::Persistence(format!(
                    "Storage locked at {}\n\n\
                    Another qtranslate process is running, or a previous instance crashed.\n\
                    To fix: rm {}/db/LOCK",
                    path.display(),
                    path.display()
                ))
            } else {
                Error::Persistence(format!("Failed to open storage at {}: {}", path.display(), e))
            }
        })?;

        debug!("Opened storage at {}", path.display());

        Ok(Self { db })
    }

    fn flush(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| Error::Persistence(format!("Flush failed: {e}")))?;
        Ok(())
    }
}

impl KeyValueStore for DiskStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.db
            .get(key.as_bytes())
            .map(|value| value.map(|v| v.to_vec()))
            .map_err(|e| Error::Persistence(e.to_string()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value)
            .map_err(|e| Error::Persistence(e.to_string()))?;

        // Flush to ensure persistence
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| Error::Persistence(e.to_string()))?;
        self.flush()
    }
}
