//! Master key lifecycle on top of a preference store.
//!
//! The key is stored base64-encoded under one preference entry. Anything
//! that does not decode to exactly 32 bytes counts as absent and is
//! replaced by a fresh random key. No error from this module ever reaches
//! the caller: a key that cannot be persisted is still used for the
//! current session.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sealed_save_core::MasterKey;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::traits::PreferenceStore;

/// Default preference entry holding the master key.
pub const DEFAULT_KEY_NAME: &str = "sealed_save.master_key.v1";

/// Owns the in-memory master key and its persisted copy.
///
/// The cached key is zeroed when it is replaced, reset, or dropped.
pub struct MasterKeyStore<P> {
    prefs: P,
    key_name: String,
    cached: Option<MasterKey>,
}

impl<P: PreferenceStore> MasterKeyStore<P> {
    /// Create a key store reading and writing `key_name` in `prefs`.
    pub fn new(prefs: P, key_name: impl Into<String>) -> Self {
        Self {
            prefs,
            key_name: key_name.into(),
            cached: None,
        }
    }

    /// Return the master key, loading or creating it on first use.
    pub fn get_or_create(&mut self) -> &MasterKey {
        let key = match self.cached.take() {
            Some(key) => key,
            None => self.load_stored().unwrap_or_else(|| self.create_and_store()),
        };
        self.cached.insert(key)
    }

    /// Forget the key in memory and remove the stored copy.
    ///
    /// The store is flushed after the delete even if it writes through. A
    /// file-backed store keeps its previous content as a backup, and that
    /// second write rotates the map still holding the old key out of it.
    pub fn reset(&mut self) {
        self.cached = None;
        match self
            .prefs
            .delete_key(&self.key_name)
            .and_then(|_| self.prefs.flush())
        {
            Ok(()) => info!(key = %self.key_name, "master key reset"),
            Err(e) => warn!(key = %self.key_name, error = %e, "failed to remove stored master key"),
        }
    }

    /// Reset and immediately create a replacement key.
    pub fn regenerate(&mut self) -> &MasterKey {
        self.reset();
        self.get_or_create()
    }

    /// Whether a value is currently stored under the key name.
    pub fn has_stored_key(&self) -> bool {
        self.prefs.has_key(&self.key_name)
    }

    /// The preference entry name.
    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// The underlying preference store.
    pub fn preferences(&self) -> &P {
        &self.prefs
    }

    fn load_stored(&self) -> Option<MasterKey> {
        let encoded = Zeroizing::new(self.prefs.get_string(&self.key_name)?);
        let decoded = match STANDARD.decode(encoded.as_bytes()) {
            Ok(bytes) => Zeroizing::new(bytes),
            Err(e) => {
                warn!(key = %self.key_name, error = %e, "stored master key is not valid base64");
                return None;
            }
        };
        match MasterKey::from_slice(&decoded) {
            Ok(key) => {
                debug!(fingerprint = %key.fingerprint(), "loaded master key");
                Some(key)
            }
            Err(e) => {
                warn!(key = %self.key_name, error = %e, "stored master key is invalid");
                None
            }
        }
    }

    fn create_and_store(&self) -> MasterKey {
        let key = MasterKey::generate();
        let encoded = Zeroizing::new(STANDARD.encode(key.as_bytes()));

        match self
            .prefs
            .set_string(&self.key_name, &encoded)
            .and_then(|_| self.prefs.flush())
        {
            Ok(()) => info!(fingerprint = %key.fingerprint(), "generated new master key"),
            Err(e) => warn!(
                fingerprint = %key.fingerprint(),
                error = %e,
                "generated master key could not be persisted, using it for this session only"
            ),
        }
        key
    }
}

impl<P> std::fmt::Debug for MasterKeyStore<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKeyStore")
            .field("key_name", &self.key_name)
            .field("cached", &self.cached)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryPreferences;
    use std::sync::Arc;

    const NAME: &str = "test.master_key";

    #[test]
    fn test_creates_and_persists_key() {
        let prefs = Arc::new(MemoryPreferences::new());
        let mut store = MasterKeyStore::new(Arc::clone(&prefs), NAME);

        let key = store.get_or_create().clone();
        let stored = prefs.get_string(NAME).expect("key persisted");
        assert_eq!(STANDARD.decode(stored).unwrap(), key.as_bytes());
    }

    #[test]
    fn test_same_key_across_calls_and_instances() {
        let prefs = Arc::new(MemoryPreferences::new());

        let first = MasterKeyStore::new(Arc::clone(&prefs), NAME)
            .get_or_create()
            .clone();

        let mut again = MasterKeyStore::new(Arc::clone(&prefs), NAME);
        assert_eq!(again.get_or_create(), &first);
        assert_eq!(again.get_or_create(), &first);
    }

    #[test]
    fn test_loads_known_key() {
        let prefs = MemoryPreferences::new();
        prefs
            .set_string(NAME, "QkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkI=")
            .unwrap();

        let mut store = MasterKeyStore::new(prefs, NAME);
        assert_eq!(store.get_or_create().as_bytes(), &[0x42; 32]);
    }

    #[test]
    fn test_invalid_base64_is_replaced() {
        let prefs = Arc::new(MemoryPreferences::new());
        prefs.set_string(NAME, "***not base64***").unwrap();

        let mut store = MasterKeyStore::new(Arc::clone(&prefs), NAME);
        let key = store.get_or_create().clone();

        let stored = prefs.get_string(NAME).unwrap();
        assert_eq!(STANDARD.decode(stored).unwrap(), key.as_bytes());
    }

    #[test]
    fn test_wrong_length_is_replaced() {
        let prefs = Arc::new(MemoryPreferences::new());
        prefs.set_string(NAME, &STANDARD.encode([7u8; 16])).unwrap();

        let mut store = MasterKeyStore::new(Arc::clone(&prefs), NAME);
        let key = store.get_or_create().clone();

        assert_ne!(key.as_bytes()[..16], [7u8; 16]);
        let stored = STANDARD.decode(prefs.get_string(NAME).unwrap()).unwrap();
        assert_eq!(stored.len(), 32);
    }

    #[test]
    fn test_reset_removes_and_regenerates() {
        let prefs = Arc::new(MemoryPreferences::new());
        let mut store = MasterKeyStore::new(Arc::clone(&prefs), NAME);

        let before = store.get_or_create().clone();
        store.reset();
        assert!(!store.has_stored_key());
        assert!(prefs.get_string(NAME).is_none());

        let after = store.get_or_create().clone();
        assert_ne!(before, after);
        assert!(store.has_stored_key());
    }

    #[test]
    fn test_reset_scrubs_file_backup() {
        use crate::atomic::BACKUP_SUFFIX;
        use crate::file::FilePreferences;
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        let prefs = Arc::new(FilePreferences::open(&path).unwrap());
        prefs.set_string("volume", "0.8").unwrap();

        let mut store = MasterKeyStore::new(Arc::clone(&prefs), NAME);
        let old = STANDARD.encode(store.get_or_create().as_bytes());
        store.reset();

        let backup = dir.path().join(format!("prefs.json{}", BACKUP_SUFFIX));
        let primary = std::fs::read_to_string(&path).unwrap();
        let previous = std::fs::read_to_string(&backup).unwrap();
        assert!(!primary.contains(&old));
        assert!(!previous.contains(&old));
        assert!(previous.contains("volume"));
        assert_eq!(prefs.get_string("volume").as_deref(), Some("0.8"));
    }

    #[test]
    fn test_regenerate() {
        let mut store = MasterKeyStore::new(MemoryPreferences::new(), NAME);
        let before = store.get_or_create().clone();
        let after = store.regenerate().clone();

        assert_ne!(before, after);
        assert_eq!(store.get_or_create(), &after);
        assert_eq!(store.key_name(), NAME);
    }
}
