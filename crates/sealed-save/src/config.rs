//! Configuration for a [`crate::SaveManager`].

use std::path::PathBuf;
use std::time::Duration;

use sealed_save_store::DEFAULT_KEY_NAME;

use crate::state::StateCodec;

/// Base file name of the save inside the save directory.
pub const DEFAULT_FILE_NAME: &str = "save.dat";

/// Quiet period after the last mutation before an autosave runs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

/// What to do when the primary save cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryPolicy {
    /// Discard and start from a fresh state. The backup is never read.
    #[default]
    FreshOnly,
    /// Try the previous generation in the backup before starting fresh.
    PromoteBackup,
}

/// Configuration for the save subsystem.
#[derive(Debug, Clone)]
pub struct SaveConfig {
    /// Application-private directory holding the save files.
    pub directory: PathBuf,
    /// Primary file name; `.tmp` and `.bak` siblings are derived from it.
    pub file_name: String,
    /// Autosave quiet period.
    pub debounce: Duration,
    /// Plaintext encoding of the state.
    pub codec: StateCodec,
    /// Load-failure handling.
    pub recovery: RecoveryPolicy,
    /// Whether to fsync the staged file and directory on every write.
    pub sync_writes: bool,
    /// Preference entry holding the master key.
    pub key_name: String,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
            debounce: DEFAULT_DEBOUNCE,
            codec: StateCodec::default(),
            recovery: RecoveryPolicy::default(),
            sync_writes: true,
            key_name: DEFAULT_KEY_NAME.to_string(),
        }
    }
}

impl SaveConfig {
    /// Default configuration rooted at `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_codec(mut self, codec: StateCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_recovery(mut self, recovery: RecoveryPolicy) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = key_name.into();
        self
    }

    /// Full path of the primary save file.
    pub fn save_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}
