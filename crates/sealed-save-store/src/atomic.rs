//! Crash-safe file replacement with a single rolling backup.
//!
//! A write goes through three sibling paths derived from one base path:
//!
//! ```text
//! save.dat      primary, the committed content
//! save.dat.tmp  staging file, fully written before anything else moves
//! save.dat.bak  previous primary
//! ```
//!
//! Sequence: write temp, rotate primary to backup, drop any leftover
//! primary, rename temp to primary. Only the renames are assumed atomic.
//! A crash before the final rename leaves the old primary in place. On
//! filesystems where rename cannot replace an existing file, a crash between
//! dropping the primary and the final rename leaves no primary at all; the
//! complete new content is then still in the temp file and the previous
//! content in the backup.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, StoreError};

/// Suffix of the staging file.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Suffix of the previous-generation file.
pub const BACKUP_SUFFIX: &str = ".bak";

/// The primary, temp and backup paths for one saved file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTriplet {
    primary: PathBuf,
    temp: PathBuf,
    backup: PathBuf,
}

impl FileTriplet {
    /// Derive the triplet from the primary path.
    pub fn new(primary: impl Into<PathBuf>) -> Self {
        let primary = primary.into();
        Self {
            temp: with_suffix(&primary, TEMP_SUFFIX),
            backup: with_suffix(&primary, BACKUP_SUFFIX),
            primary,
        }
    }

    pub fn primary(&self) -> &Path {
        &self.primary
    }

    pub fn temp(&self) -> &Path {
        &self.temp
    }

    pub fn backup(&self) -> &Path {
        &self.backup
    }

    /// All three paths in deletion order: temp, backup, primary.
    pub fn all(&self) -> [&Path; 3] {
        [&self.temp, &self.backup, &self.primary]
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Atomically replace `target` with `bytes`, rotating the old content to
/// `target.bak`. Syncs the staged file and the directory.
pub fn write_atomic(target: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    write_triplet(&FileTriplet::new(target.as_ref()), bytes, true)
}

/// Owner of one file triplet.
///
/// All reads and writes of the save file go through here; nothing else in
/// the process touches these paths.
#[derive(Debug, Clone)]
pub struct AtomicFilePersister {
    paths: FileTriplet,
    sync_writes: bool,
}

impl AtomicFilePersister {
    /// Persister for `primary` with write syncing enabled.
    pub fn new(primary: impl Into<PathBuf>) -> Self {
        Self {
            paths: FileTriplet::new(primary),
            sync_writes: true,
        }
    }

    /// Enable or disable `fsync` of the staged file and parent directory.
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// The managed paths.
    pub fn paths(&self) -> &FileTriplet {
        &self.paths
    }

    /// Whether the primary file exists.
    pub fn exists(&self) -> bool {
        self.paths.primary.exists()
    }

    /// Whether the backup file exists.
    pub fn backup_exists(&self) -> bool {
        self.paths.backup.exists()
    }

    /// Create the directory holding the triplet if it is missing.
    pub fn ensure_parent_dir(&self) -> Result<()> {
        match self.paths.primary.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))
            }
            _ => Ok(()),
        }
    }

    /// Replace the primary with `bytes`.
    ///
    /// On success the primary holds exactly `bytes` and the backup holds the
    /// previous primary, if there was one.
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        write_triplet(&self.paths, bytes, self.sync_writes)
    }

    /// Read the primary. `Ok(None)` if it does not exist.
    pub fn read_primary(&self) -> Result<Option<Vec<u8>>> {
        read_optional(&self.paths.primary)
    }

    /// Read the backup. `Ok(None)` if it does not exist.
    pub fn read_backup(&self) -> Result<Option<Vec<u8>>> {
        read_optional(&self.paths.backup)
    }

    /// Delete the primary only, leaving the backup in place.
    pub fn remove_primary(&self) -> Result<()> {
        remove_if_exists(&self.paths.primary)
            .map(|_| ())
            .map_err(|e| StoreError::io(&self.paths.primary, e))
    }

    /// Best-effort delete of temp, backup and primary.
    ///
    /// Each path is attempted regardless of earlier failures. Returns the
    /// number of paths that could not be removed.
    pub fn remove_all(&self) -> usize {
        let mut failures = 0;
        for path in self.paths.all() {
            match remove_if_exists(path) {
                Ok(true) => debug!(path = %path.display(), "removed save file"),
                Ok(false) => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove save file");
                    failures += 1;
                }
            }
        }
        failures
    }
}

fn write_triplet(paths: &FileTriplet, bytes: &[u8], sync: bool) -> Result<()> {
    if let Err(e) = write_temp(&paths.temp, bytes, sync) {
        let _ = remove_if_exists(&paths.temp);
        return Err(StoreError::io(&paths.temp, e));
    }

    if paths.primary.exists() {
        if let Err(e) = remove_if_exists(&paths.backup) {
            warn!(path = %paths.backup.display(), error = %e, "could not remove old backup");
        }
        if let Err(e) = fs::rename(&paths.primary, &paths.backup) {
            warn!(
                from = %paths.primary.display(),
                to = %paths.backup.display(),
                error = %e,
                "backup rotation failed, continuing without backup"
            );
        }
    }

    if let Err(e) = remove_if_exists(&paths.primary) {
        warn!(path = %paths.primary.display(), error = %e, "could not remove stale primary");
    }

    fs::rename(&paths.temp, &paths.primary).map_err(|e| StoreError::io(&paths.primary, e))?;

    if sync {
        sync_parent_dir(&paths.primary);
    }

    debug!(path = %paths.primary.display(), bytes = bytes.len(), "file replaced");
    Ok(())
}

fn write_temp(path: &Path, bytes: &[u8], sync: bool) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// Returns whether a file was actually removed.
fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) {
    let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return;
    };
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        debug!(path = %dir.display(), error = %e, "directory sync failed");
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) {}
