//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use sealed_save::{MemoryPreferences, SaveConfig, SaveManager, SaveState};

/// A representative game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameProgress {
    pub coins: u64,
    pub level: u32,
    pub unlocked: Vec<String>,
    pub best_lap_ms: Option<u16>,
    /// Set by [`SaveState::initialize`]; never persisted.
    #[serde(skip)]
    pub initialized: bool,
}

impl Default for GameProgress {
    fn default() -> Self {
        Self {
            coins: 100,
            level: 1,
            unlocked: vec!["starter".to_string()],
            best_lap_ms: None,
            initialized: false,
        }
    }
}

impl SaveState for GameProgress {
    fn initialize(&mut self) {
        self.initialized = true;
    }
}

/// A temp save directory and in-memory preferences.
pub struct TestFixture {
    pub dir: TempDir,
    pub prefs: Arc<MemoryPreferences>,
}

impl TestFixture {
    /// Create a fixture in a fresh temp directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
            prefs: Arc::new(MemoryPreferences::new()),
        }
    }

    /// Config for this fixture's directory with fsync off.
    pub fn config(&self) -> SaveConfig {
        SaveConfig::new(self.dir.path()).with_sync_writes(false)
    }

    /// A manager sharing this fixture's directory and preferences.
    pub fn manager(&self) -> SaveManager<GameProgress, Arc<MemoryPreferences>> {
        self.manager_with(self.config())
    }

    /// A manager with a custom config, sharing this fixture's preferences.
    pub fn manager_with(
        &self,
        config: SaveConfig,
    ) -> SaveManager<GameProgress, Arc<MemoryPreferences>> {
        SaveManager::new(config, Arc::clone(&self.prefs)).expect("create save manager")
    }

    /// Simulate the platform wiping preferences, losing the master key.
    pub fn forget_preferences(&mut self) {
        self.prefs = Arc::new(MemoryPreferences::new());
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts economy rebroadcasts.
#[derive(Debug, Clone, Default)]
pub struct RecordingEconomy {
    calls: Rc<Cell<usize>>,
}

impl RecordingEconomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl sealed_save::EconomyBroadcast for RecordingEconomy {
    fn rebroadcast(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

/// Records requested scene indices.
#[derive(Debug, Clone, Default)]
pub struct RecordingScenes {
    loaded: Rc<RefCell<Vec<usize>>>,
}

impl RecordingScenes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(&self) -> Vec<usize> {
        self.loaded.borrow().clone()
    }
}

impl sealed_save::SceneReloader for RecordingScenes {
    fn reload_scene(&self, index: usize) {
        self.loaded.borrow_mut().push(index);
    }
}

/// Install a test-writer tracing subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}
