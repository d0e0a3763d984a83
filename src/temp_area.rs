// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Private temporary directory for slice files.
//!
//! Each [`TempArea`] owns one directory under a temp root. It only ever removes
//! files it wrote itself, and the whole directory goes away when it's dropped.
//! Directories left behind by instances that never got to drop (crashes, kills)
//! are reclaimed by the next instance once they've been idle long enough.
//!
//! Nothing here handles signals. An embedding application that wants the
//! directory gone on SIGINT or SIGTERM has to catch the signal and drop (or
//! release) the area itself; otherwise it's left for stale reclamation.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::SliceError;

/// Extension used for every slice file. Slices are always written as WAV.
pub const SLICE_EXTENSION: &str = "wav";

/// Stem used when the source path has no file name.
const DEFAULT_STEM: &str = "audio";

/// Length of the random part of an instance ID.
const INSTANCE_SUFFIX_LEN: usize = 8;

/// Owns one instance directory and the slice files written into it.
pub struct TempArea {
    /// The instance directory.
    dir: PathBuf,
    /// Unique ID for this instance, the part of the directory name after the prefix.
    instance_id: String,
    /// Every file written through this area that hasn't been cleaned up.
    tracked: Mutex<HashSet<PathBuf>>,
    /// Number of successful writes over the lifetime of the area.
    writes: AtomicU64,
}

impl TempArea {
    /// Creates `<root>/<prefix>_<instance id>` and removes sibling directories with
    /// the same prefix that haven't been modified for longer than `stale_after`.
    pub fn new(root: &Path, prefix: &str, stale_after: Duration) -> Result<Self, SliceError> {
        let instance_id = generate_instance_id();
        let dir = root.join(format!("{}_{}", prefix, instance_id));

        let io_error = |source| SliceError::Io {
            path: dir.clone(),
            source,
        };
        fs::create_dir_all(&dir).map_err(io_error)?;
        let dir = fs::canonicalize(&dir).map_err(io_error)?;

        info!(dir = ?dir, "Created slice directory");

        let reclaimed = reclaim_stale_dirs(root, prefix, &dir, stale_after);
        if reclaimed > 0 {
            info!(root = ?root, reclaimed, "Removed stale slice directories");
        }

        Ok(TempArea {
            dir,
            instance_id,
            tracked: Mutex::new(HashSet::new()),
            writes: AtomicU64::new(0),
        })
    }

    /// Returns the instance directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the unique ID of this instance.
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Returns the file name used for a slice of the given source,
    /// `<stem>_slice<n>_of_<total>.wav`.
    pub fn filename_for(original: &Path, slice_number: u32, total_slices: u32) -> String {
        let stem = original
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or(DEFAULT_STEM.into());
        format!(
            "{}_slice{}_of_{}.{}",
            stem, slice_number, total_slices, SLICE_EXTENSION
        )
    }

    /// Returns the path in the instance directory for a slice of the given source.
    pub fn path_for(&self, original: &Path, slice_number: u32, total_slices: u32) -> PathBuf {
        self.dir
            .join(TempArea::filename_for(original, slice_number, total_slices))
    }

    /// Writes the bytes to the given path and tracks it for cleanup. Nothing is
    /// tracked if the write fails.
    ///
    /// If the instance directory has been removed out from under us (a tmp cleaner,
    /// or another instance reclaiming it as stale), it's recreated and the write is
    /// tried once more.
    pub fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), SliceError> {
        let io_error = |source| SliceError::Io {
            path: path.to_path_buf(),
            source,
        };

        match fs::write(path, bytes) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound && !self.dir.is_dir() => {
                warn!(dir = ?self.dir, "Slice directory disappeared, recreating it");
                fs::create_dir_all(&self.dir).map_err(|source| SliceError::Io {
                    path: self.dir.clone(),
                    source,
                })?;
                fs::write(path, bytes).map_err(io_error)?;
            }
            Err(e) => return Err(io_error(e)),
        }

        self.tracked.lock().insert(path.to_path_buf());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Removes every tracked file and forgets about it. Files that are already gone
    /// are ignored, so this is safe to call repeatedly.
    pub fn cleanup(&self) {
        let tracked: Vec<PathBuf> = self.tracked.lock().drain().collect();
        if tracked.is_empty() {
            return;
        }

        for path in tracked.iter() {
            match fs::remove_file(path) {
                Ok(()) => debug!(path = ?path, "Removed slice file"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(path = ?path, err = %e, "Unable to remove slice file"),
            }
        }

        info!(files = tracked.len(), dir = ?self.dir, "Cleaned up slice files");
    }

    /// Returns the files currently tracked, sorted.
    pub fn tracked_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self.tracked.lock().iter().cloned().collect();
        files.sort();
        files
    }

    /// Returns the number of successful writes made through this area.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Removes the instance directory and everything in it, reporting any failure.
    /// Dropping the area does the same but can only log failures.
    pub fn release(self) -> Result<(), SliceError> {
        self.tracked.lock().clear();
        remove_instance_dir(&self.dir).map_err(|source| SliceError::Io {
            path: self.dir.clone(),
            source,
        })
    }
}

impl Drop for TempArea {
    fn drop(&mut self) {
        if let Err(e) = remove_instance_dir(&self.dir) {
            warn!(dir = ?self.dir, err = %e, "Unable to remove slice directory");
        }
    }
}

impl std::fmt::Debug for TempArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TempArea")
            .field("dir", &self.dir)
            .field("tracked_files", &self.tracked.lock().len())
            .field("writes", &self.write_count())
            .finish()
    }
}

/// Removes the directory tree, treating an already missing directory as success.
fn remove_instance_dir(dir: &Path) -> std::io::Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {
            debug!(dir = ?dir, "Removed slice directory");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Generates `<unix millis>_<random alphanumerics>`.
fn generate_instance_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(INSTANCE_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{}_{}", millis, suffix)
}

/// Removes directories in `root` named `<prefix>_*` that haven't been modified
/// within `stale_after`, skipping `own_dir`. Failures are logged and skipped.
/// Returns the number of directories removed.
fn reclaim_stale_dirs(
    root: &Path,
    prefix: &str,
    own_dir: &Path,
    stale_after: Duration,
) -> usize {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(root = ?root, err = %e, "Unable to scan for stale slice directories");
            return 0;
        }
    };

    let marker = format!("{}_", prefix);
    let mut reclaimed = 0;
    for entry in entries.flatten() {
        let is_candidate = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(&marker));
        if !is_candidate {
            continue;
        }

        let path = entry.path();
        if path == own_dir || fs::canonicalize(&path).is_ok_and(|p| p == own_dir) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) if metadata.is_dir() => metadata,
            Ok(_) => continue,
            Err(e) => {
                warn!(path = ?path, err = %e, "Unable to inspect slice directory");
                continue;
            }
        };

        let idle = metadata
            .modified()
            .ok()
            .and_then(|modified| modified.elapsed().ok());
        match idle {
            Some(idle) if idle > stale_after => match fs::remove_dir_all(&path) {
                Ok(()) => {
                    debug!(
                        path = ?path,
                        idle_secs = idle.as_secs(),
                        "Removed stale slice directory"
                    );
                    reclaimed += 1;
                }
                Err(e) => {
                    warn!(path = ?path, err = %e, "Unable to remove stale slice directory")
                }
            },
            _ => {}
        }
    }

    reclaimed
}
