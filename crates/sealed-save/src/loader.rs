//! Load-or-create of the saved state.
//!
//! Loading never fails from the caller's point of view. Every problem with
//! the file (unreadable, truncated, tampered, unknown version, bad padding,
//! undecodable or null state) is logged and replaced by a fresh default
//! state. The [`LoadOutcome`] tells the caller which path was taken.

use sealed_save_core::{decrypt, MasterKey};
use sealed_save_store::AtomicFilePersister;
use tracing::{debug, info, warn};

use crate::config::RecoveryPolicy;
use crate::error::{Result, SaveError};
use crate::state::{fresh_state, SaveState, StateCodec};

/// How [`SaveLoader::load_or_create`] arrived at its state.
#[derive(Debug)]
pub enum LoadOutcome {
    /// No save file existed; a fresh state was created.
    Fresh,
    /// The primary save file was loaded.
    Loaded,
    /// The primary was missing or unusable and the backup was loaded.
    ///
    /// `primary_error` is `None` when the primary was simply absent.
    RecoveredFromBackup { primary_error: Option<SaveError> },
    /// The save file was unusable and a fresh state was created.
    Discarded(SaveError),
}

impl LoadOutcome {
    /// Whether the resulting state is a fresh default.
    pub fn is_fresh(&self) -> bool {
        matches!(self, LoadOutcome::Fresh | LoadOutcome::Discarded(_))
    }

    /// The error that caused the primary to be discarded, if any.
    pub fn error(&self) -> Option<&SaveError> {
        match self {
            LoadOutcome::Discarded(e) => Some(e),
            LoadOutcome::RecoveredFromBackup { primary_error } => primary_error.as_ref(),
            LoadOutcome::Fresh | LoadOutcome::Loaded => None,
        }
    }
}

/// Reads, authenticates, decrypts and decodes a save file triplet.
#[derive(Debug, Clone, Copy)]
pub struct SaveLoader<'a> {
    persister: &'a AtomicFilePersister,
    codec: StateCodec,
    recovery: RecoveryPolicy,
}

impl<'a> SaveLoader<'a> {
    pub fn new(
        persister: &'a AtomicFilePersister,
        codec: StateCodec,
        recovery: RecoveryPolicy,
    ) -> Self {
        Self {
            persister,
            codec,
            recovery,
        }
    }

    /// Load the saved state, or create a fresh one.
    ///
    /// [`SaveState::initialize`] has run on the returned state on every path.
    pub fn load_or_create<S: SaveState>(&self, master: &MasterKey) -> (S, LoadOutcome) {
        let path = self.persister.paths().primary();

        let primary = match self.persister.read_primary() {
            Ok(Some(bytes)) => self.open::<S>(&bytes, master),
            Ok(None) => {
                if self.recovery == RecoveryPolicy::PromoteBackup && self.persister.backup_exists()
                {
                    info!(path = %path.display(), "save file missing, trying backup");
                    return self.recover(master, None);
                }
                debug!(path = %path.display(), "no save file, starting fresh");
                return (fresh_state(), LoadOutcome::Fresh);
            }
            Err(e) => Err(e.into()),
        };

        match primary {
            Ok(mut state) => {
                state.initialize();
                debug!(path = %path.display(), "save loaded");
                (state, LoadOutcome::Loaded)
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    kind = ?e.kind(),
                    "save file unusable"
                );
                match self.recovery {
                    RecoveryPolicy::PromoteBackup => self.recover(master, Some(e)),
                    RecoveryPolicy::FreshOnly => {
                        warn!("discarding save, starting fresh");
                        (fresh_state(), LoadOutcome::Discarded(e))
                    }
                }
            }
        }
    }

    /// Authenticate, decrypt and decode one envelope.
    pub fn open<S: SaveState>(&self, envelope: &[u8], master: &MasterKey) -> Result<S> {
        let plaintext = decrypt(envelope, master)?;
        self.codec.decode(&plaintext)
    }

    fn recover<S: SaveState>(
        &self,
        master: &MasterKey,
        primary_error: Option<SaveError>,
    ) -> (S, LoadOutcome) {
        let backup = self.persister.paths().backup();

        let attempt = match self.persister.read_backup() {
            Ok(Some(bytes)) => self.open::<S>(&bytes, master),
            Ok(None) => Err(SaveError::Store(sealed_save_store::StoreError::io(
                backup,
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ))),
            Err(e) => Err(e.into()),
        };

        match attempt {
            Ok(mut state) => {
                match &primary_error {
                    // Drop the bad primary so the next write does not rotate
                    // it over the good backup.
                    Some(e) if e.is_content_error() => {
                        if let Err(e) = self.persister.remove_primary() {
                            warn!(error = %e, "could not remove unusable primary");
                        }
                    }
                    Some(e) => warn!(
                        path = %self.persister.paths().primary().display(),
                        error = %e,
                        "primary unreadable, leaving it in place"
                    ),
                    None => {}
                }
                state.initialize();
                info!(path = %backup.display(), "recovered save from backup");
                (state, LoadOutcome::RecoveredFromBackup { primary_error })
            }
            Err(backup_error) => {
                warn!(
                    path = %backup.display(),
                    error = %backup_error,
                    "backup unusable, starting fresh"
                );
                let cause = primary_error.unwrap_or(backup_error);
                (fresh_state(), LoadOutcome::Discarded(cause))
            }
        }
    }
}
