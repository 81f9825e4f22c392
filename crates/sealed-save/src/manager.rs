//! The SaveManager: one context object for load, autosave and reset.
//!
//! Built once at the composition root and passed to whatever needs save
//! services. Everything runs on the caller's thread: `tick` is expected to
//! be called from the host's frame loop, and a flush blocks that tick until
//! the file has been replaced.

use std::time::Instant;

use sealed_save_core::encrypt;
use sealed_save_store::{AtomicFilePersister, FileTriplet, MasterKeyStore, PreferenceStore};
use tracing::{debug, info, warn};

use crate::config::SaveConfig;
use crate::error::Result;
use crate::hooks::{EconomyBroadcast, SceneReloader};
use crate::loader::{LoadOutcome, SaveLoader};
use crate::scheduler::{AutosaveScheduler, Tick};
use crate::state::{fresh_state, SaveState};

/// Owns the save state, its key, its files and its autosave schedule.
pub struct SaveManager<S, P> {
    config: SaveConfig,
    keys: MasterKeyStore<P>,
    persister: AtomicFilePersister,
    scheduler: AutosaveScheduler,
    state: Option<S>,
    economy: Option<Box<dyn EconomyBroadcast>>,
    scene_reloader: Option<Box<dyn SceneReloader>>,
}

impl<S: SaveState, P: PreferenceStore> SaveManager<S, P> {
    /// Create a manager. Creates the save directory if needed.
    ///
    /// No file is read until [`load_or_create`](Self::load_or_create).
    pub fn new(config: SaveConfig, prefs: P) -> Result<Self> {
        let persister =
            AtomicFilePersister::new(config.save_path()).with_sync_writes(config.sync_writes);
        persister.ensure_parent_dir()?;

        Ok(Self {
            keys: MasterKeyStore::new(prefs, config.key_name.clone()),
            scheduler: AutosaveScheduler::new(config.debounce),
            persister,
            config,
            state: None,
            economy: None,
            scene_reloader: None,
        })
    }

    /// Notify `economy` after every reset.
    pub fn with_economy(mut self, economy: impl EconomyBroadcast + 'static) -> Self {
        self.economy = Some(Box::new(economy));
        self
    }

    /// Use `reloader` when a reset asks for a scene reload.
    pub fn with_scene_reloader(mut self, reloader: impl SceneReloader + 'static) -> Self {
        self.scene_reloader = Some(Box::new(reloader));
        self
    }

    pub fn config(&self) -> &SaveConfig {
        &self.config
    }

    /// The primary, temp and backup paths.
    pub fn paths(&self) -> &FileTriplet {
        self.persister.paths()
    }

    pub fn key_store(&self) -> &MasterKeyStore<P> {
        &self.keys
    }

    pub fn preferences(&self) -> &P {
        self.keys.preferences()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State
    // ─────────────────────────────────────────────────────────────────────────

    /// Load the state from disk, or start fresh.
    ///
    /// Replaces any state already held. Never fails; the outcome reports
    /// whether the file was used.
    pub fn load_or_create(&mut self) -> LoadOutcome {
        let master = self.keys.get_or_create();
        let loader = SaveLoader::new(&self.persister, self.config.codec, self.config.recovery);
        let (state, outcome) = loader.load_or_create::<S>(master);
        self.state = Some(state);
        outcome
    }

    /// The current state, if one has been loaded or created.
    pub fn state(&self) -> Option<&S> {
        self.state.as_ref()
    }

    /// Mutable access to the state, creating a fresh one if none exists.
    ///
    /// Does not schedule a save; pair with [`mark_dirty`](Self::mark_dirty)
    /// or use [`update`](Self::update).
    pub fn state_mut(&mut self) -> &mut S {
        self.state.get_or_insert_with(fresh_state)
    }

    /// Mutate the state and schedule an autosave from `now`.
    pub fn update<R>(&mut self, now: Instant, f: impl FnOnce(&mut S) -> R) -> R {
        let result = f(self.state_mut());
        self.mark_dirty(now);
        result
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Autosave
    // ─────────────────────────────────────────────────────────────────────────

    /// Record a mutation at `now`.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.scheduler.mark_dirty(now);
    }

    /// Whether a save is pending.
    pub fn is_dirty(&self) -> bool {
        self.scheduler.is_dirty()
    }

    pub fn scheduler(&self) -> &AutosaveScheduler {
        &self.scheduler
    }

    /// Drive the autosave from the host loop.
    ///
    /// Returns `Ok(Tick::Flush)` after a successful autosave. A failed
    /// autosave is logged and returned; it is not retried until the state is
    /// marked dirty again.
    pub fn tick(&mut self, now: Instant) -> Result<Tick> {
        match self.scheduler.tick(now) {
            Tick::Idle => Ok(Tick::Idle),
            Tick::Flush => self.persist().map(|_| Tick::Flush),
        }
    }

    /// Save immediately if a save is pending, ignoring the debounce.
    ///
    /// For application pause and quit. Returns whether anything was written.
    pub fn flush_pending(&mut self) -> Result<bool> {
        if self.scheduler.take_pending() {
            self.persist()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Serialize, seal and write the state now.
    ///
    /// Creates a fresh state first if none exists. Clears any pending
    /// autosave before writing. Failures are logged and returned; the
    /// in-memory state is untouched.
    pub fn save_now(&mut self) -> Result<()> {
        self.scheduler.clear();
        self.persist()
    }

    fn persist(&mut self) -> Result<()> {
        let result = self.write_state();
        match &result {
            Ok(bytes) => debug!(
                path = %self.persister.paths().primary().display(),
                bytes,
                "state saved"
            ),
            Err(e) => warn!(error = %e, kind = ?e.kind(), "save failed"),
        }
        result.map(|_| ())
    }

    fn write_state(&mut self) -> Result<usize> {
        let state = self.state.get_or_insert_with(fresh_state);
        let plaintext = self.config.codec.encode(state)?;
        let envelope = encrypt(&plaintext, self.keys.get_or_create())?;
        self.persister.write(&envelope)?;
        Ok(envelope.len())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reset
    // ─────────────────────────────────────────────────────────────────────────

    /// Wipe all save data and start over.
    ///
    /// Deletes the temp, backup and primary files individually (a failure on
    /// one does not stop the others), replaces the master key, installs a
    /// fresh state, drops any pending autosave, asks the economy to
    /// rebroadcast, and reloads `reload_scene` if given.
    pub fn reset(&mut self, reload_scene: Option<usize>) {
        let failures = self.persister.remove_all();
        if failures > 0 {
            warn!(failures, "some save files could not be removed");
        }

        let fingerprint = self.keys.regenerate().fingerprint();
        self.state = Some(fresh_state());
        self.scheduler.clear();
        info!(fingerprint = %fingerprint, "save data reset");

        if let Some(economy) = &self.economy {
            economy.rebroadcast();
        }
        if let Some(index) = reload_scene {
            match &self.scene_reloader {
                Some(reloader) => reloader.reload_scene(index),
                None => debug!(index, "scene reload requested but no reloader installed"),
            }
        }
    }
}

impl<S, P> std::fmt::Debug for SaveManager<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveManager")
            .field("config", &self.config)
            .field("keys", &self.keys)
            .field("scheduler", &self.scheduler)
            .field("has_state", &self.state.is_some())
            .finish()
    }
}
