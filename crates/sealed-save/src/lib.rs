//! # Sealed Save
//!
//! Encrypted, crash-safe persistence of one mutable application state.
//!
//! ## Overview
//!
//! - **Sealing**: the state is serialized, encrypted with AES-256-CBC and
//!   authenticated with HMAC-SHA256 under subkeys of a per-install master key
//! - **Atomic replace**: every write stages a temp file and renames it over
//!   the primary, keeping the previous generation as a backup
//! - **Autosave**: mutations are debounced into one write after a quiet period
//! - **Availability first**: a missing, tampered or corrupt save never
//!   surfaces as an error on load; the host gets a fresh state instead
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Instant;
//!
//! use serde::{Deserialize, Serialize};
//! use sealed_save::{SaveConfig, SaveManager, SaveState};
//! use sealed_save::store::FilePreferences;
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct Progress {
//!     coins: u64,
//! }
//!
//! impl SaveState for Progress {}
//!
//! let prefs = FilePreferences::open("data/prefs.json").unwrap();
//! let mut saves: SaveManager<Progress, _> =
//!     SaveManager::new(SaveConfig::new("data"), prefs).unwrap();
//!
//! saves.load_or_create();
//! saves.update(Instant::now(), |p| p.coins += 10);
//!
//! // Every frame:
//! let _ = saves.tick(Instant::now());
//!
//! // On quit:
//! let _ = saves.flush_pending();
//! ```
//!
//! ## Re-exports
//!
//! - `sealed_save::core` - Key material and the envelope cipher
//! - `sealed_save::store` - Preferences, key store and atomic file replacement

pub mod config;
pub mod error;
pub mod hooks;
pub mod loader;
pub mod manager;
pub mod scheduler;
pub mod state;

// Re-export component crates
pub use sealed_save_core as core;
pub use sealed_save_store as store;

// Re-export main types for convenience
pub use config::{RecoveryPolicy, SaveConfig, DEFAULT_DEBOUNCE, DEFAULT_FILE_NAME};
pub use error::{Result, SaveError};
pub use hooks::{EconomyBroadcast, SceneReloader};
pub use loader::{LoadOutcome, SaveLoader};
pub use manager::SaveManager;
pub use scheduler::{AutosaveScheduler, Tick};
pub use state::{fresh_state, SaveState, StateCodec};

pub use sealed_save_core::{ErrorKind, MasterKey};
pub use sealed_save_store::{MemoryPreferences, PreferenceStore};
