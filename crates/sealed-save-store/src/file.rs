//! File-backed implementation of the PreferenceStore trait.
//!
//! Preferences are kept as a flat JSON object and rewritten through the
//! atomic persister on every mutation, so the file is always either the
//! previous or the next complete map.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::warn;

use crate::atomic::AtomicFilePersister;
use crate::error::{Result, StoreError};
use crate::traits::PreferenceStore;

/// JSON-file preference store.
#[derive(Debug)]
pub struct FilePreferences {
    persister: AtomicFilePersister,
    values: RwLock<BTreeMap<String, String>>,
}

impl FilePreferences {
    /// Open (or lazily create) the preference file at `path`.
    ///
    /// A missing file starts empty. An unreadable or malformed file is
    /// logged and also starts empty; it is replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let persister = AtomicFilePersister::new(path);
        persister.ensure_parent_dir()?;

        let values = match persister.read_primary() {
            Ok(Some(bytes)) => serde_json::from_slice::<BTreeMap<String, String>>(&bytes)
                .unwrap_or_else(|e| {
                    warn!(
                        path = %persister.paths().primary().display(),
                        error = %e,
                        "preference file is malformed, starting empty"
                    );
                    BTreeMap::new()
                }),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!(error = %e, "preference file unreadable, starting empty");
                BTreeMap::new()
            }
        };

        Ok(Self {
            persister,
            values: RwLock::new(values),
        })
    }

    /// Path of the preference file.
    pub fn path(&self) -> &std::path::Path {
        self.persister.paths().primary()
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(values)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.persister.write(&bytes)
    }
}

impl PreferenceStore for FilePreferences {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| StoreError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn delete_key(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| StoreError::LockPoisoned)?;
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }

    /// Rewrite the file. The backup then holds the same map, so content
    /// replaced by the previous write no longer survives in it.
    fn flush(&self) -> Result<()> {
        let values = self.values.read().map_err(|_| StoreError::LockPoisoned)?;
        self.persist(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");

        {
            let prefs = FilePreferences::open(&path).unwrap();
            prefs.set_string("volume", "0.8").unwrap();
            prefs.set_string("name", "player").unwrap();
            prefs.delete_key("name").unwrap();
        }

        let reopened = FilePreferences::open(&path).unwrap();
        assert_eq!(reopened.get_string("volume").as_deref(), Some("0.8"));
        assert!(reopened.get_string("name").is_none());
    }

    #[test]
    fn test_malformed_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, b"not json at all").unwrap();

        let prefs = FilePreferences::open(&path).unwrap();
        assert!(prefs.get_string("anything").is_none());

        prefs.set_string("k", "v").unwrap();
        let reopened = FilePreferences::open(&path).unwrap();
        assert_eq!(reopened.get_string("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config").join("prefs.json");

        let prefs = FilePreferences::open(&path).unwrap();
        prefs.set_string("k", "v").unwrap();
        assert!(path.exists());
        assert_eq!(prefs.path(), path.as_path());
    }

    #[test]
    fn test_delete_missing_key_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");

        let prefs = FilePreferences::open(&path).unwrap();
        prefs.delete_key("absent").unwrap();
        assert!(!path.exists());

        prefs.flush().unwrap();
        assert!(path.exists());
    }
}
