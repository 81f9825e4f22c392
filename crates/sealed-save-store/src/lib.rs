//! # Sealed Save Store
//!
//! Everything in sealed-save that touches durable storage: the preference
//! store holding the master key, the key lifecycle on top of it, and the
//! crash-safe replacement of the save file itself.
//!
//! ## Key Types
//!
//! - [`PreferenceStore`] - Small string key/value store (the master key lives here)
//! - [`MemoryPreferences`] - In-memory preferences for tests and ephemeral sessions
//! - [`FilePreferences`] - JSON-file preferences, written atomically
//! - [`MasterKeyStore`] - Get-or-create and reset of the master key
//! - [`AtomicFilePersister`] - Write-temp, rotate-backup, replace-primary
//! - [`FileTriplet`] - The `primary` / `.tmp` / `.bak` paths for one base file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sealed_save_store::{AtomicFilePersister, MasterKeyStore, MemoryPreferences};
//!
//! let mut keys = MasterKeyStore::new(MemoryPreferences::new(), "master_key");
//! let master = keys.get_or_create().clone();
//!
//! let persister = AtomicFilePersister::new("saves/save.dat");
//! persister.write(b"sealed bytes").unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Single writer**: one process owns the file triplet; no locking is done.
//! - **Rename is the commit point**: the primary is only ever replaced by a
//!   rename of a fully written temp file.
//! - **Key errors never surface**: an unreadable stored key is treated as absent.

pub mod atomic;
pub mod error;
pub mod file;
pub mod keystore;
pub mod memory;
pub mod traits;

pub use atomic::{write_atomic, AtomicFilePersister, FileTriplet, BACKUP_SUFFIX, TEMP_SUFFIX};
pub use error::{Result, StoreError};
pub use file::FilePreferences;
pub use keystore::{MasterKeyStore, DEFAULT_KEY_NAME};
pub use memory::MemoryPreferences;
pub use traits::PreferenceStore;
