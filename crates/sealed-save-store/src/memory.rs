//! In-memory implementation of the PreferenceStore trait.
//!
//! Same semantics as the file-backed store but nothing survives the
//! process. Used by tests and by hosts that supply their own key.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::traits::PreferenceStore;

/// In-memory preference store. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferences {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| StoreError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_key(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| StoreError::LockPoisoned)?;
        values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_set_get_delete() {
        let prefs = MemoryPreferences::new();
        assert!(prefs.get_string("k").is_none());

        prefs.set_string("k", "v1").unwrap();
        prefs.set_string("k", "v2").unwrap();
        assert_eq!(prefs.get_string("k").as_deref(), Some("v2"));
        assert!(prefs.has_key("k"));
        assert_eq!(prefs.len(), 1);

        prefs.delete_key("k").unwrap();
        prefs.delete_key("k").unwrap();
        assert!(!prefs.has_key("k"));
        assert!(prefs.is_empty());
    }

    #[test]
    fn test_shared_through_arc() {
        let prefs = Arc::new(MemoryPreferences::new());
        let handle = Arc::clone(&prefs);

        handle.set_string("shared", "yes").unwrap();
        assert_eq!(prefs.get_string("shared").as_deref(), Some("yes"));
    }
}
