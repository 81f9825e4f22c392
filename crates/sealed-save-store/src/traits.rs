//! PreferenceStore trait: the abstract interface for small persisted settings.
//!
//! The master key is the only thing sealed-save keeps here, but the trait is
//! shaped like a general string key/value store so hosts can hand over the
//! preference facility they already have.

use std::sync::Arc;

use crate::error::Result;

/// A process-wide string key/value store.
///
/// Methods take `&self`; implementations use interior mutability so one
/// store can be shared between the key manager and the host.
pub trait PreferenceStore: Send + Sync {
    /// Read a value. Missing keys and unreadable stores both yield `None`.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Insert or replace a value.
    fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing a missing key is not an error.
    fn delete_key(&self, key: &str) -> Result<()>;

    /// Whether a value is present.
    fn has_key(&self, key: &str) -> bool {
        self.get_string(key).is_some()
    }

    /// Push pending changes to durable storage.
    ///
    /// Stores that write through on every mutation keep the default.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

impl<P: PreferenceStore + ?Sized> PreferenceStore for Arc<P> {
    fn get_string(&self, key: &str) -> Option<String> {
        (**self).get_string(key)
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_string(key, value)
    }

    fn delete_key(&self, key: &str) -> Result<()> {
        (**self).delete_key(key)
    }

    fn has_key(&self, key: &str) -> bool {
        (**self).has_key(key)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }
}
