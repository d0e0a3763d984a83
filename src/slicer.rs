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

//! Cuts audio files into equal slices on demand.
//!
//! A source is decoded once per (path, divisions) request, each slice is encoded
//! back into the source's format and written into the temp area, and the result
//! is cached so later requests (and playback lookups) are free.

mod descriptor;
mod ranges;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

pub use descriptor::SliceDescriptor;
pub use ranges::{slice_ranges, SliceRange};

use crate::audio::{decode_file, encode, extract, DecodedAudio};
use crate::cache::{SliceCache, SliceKey};
use crate::config::{PartialSlicePolicy, SlicerConfig};
use crate::error::SliceError;
use crate::temp_area::TempArea;

/// A shared slicing result that concurrent requests for the same key wait on.
type InFlight = Arc<OnceCell<Arc<[SliceDescriptor]>>>;

/// Slices audio files and owns the cache and temp area backing them.
///
/// Cloning is cheap and clones share all state.
#[derive(Clone)]
pub struct Slicer {
    inner: Arc<SlicerInner>,
}

struct SlicerInner {
    cache: SliceCache,
    temp_area: TempArea,
    partial_policy: PartialSlicePolicy,
    /// Requests currently being computed, so that concurrent callers share one decode.
    in_flight: Mutex<HashMap<SliceKey, InFlight>>,
}

impl Slicer {
    /// Creates a slicer with an empty cache and a fresh temp area.
    pub fn new(config: &SlicerConfig) -> Result<Slicer, SliceError> {
        let temp_area = TempArea::new(
            &config.temp_root(),
            config.temp_dir_prefix()?,
            config.stale_after()?,
        )?;

        Ok(Slicer {
            inner: Arc::new(SlicerInner {
                cache: SliceCache::new(),
                temp_area,
                partial_policy: config.partial_slices(),
                in_flight: Mutex::new(HashMap::new()),
            }),
        })
    }

    /// Slices the file at `path` into `divisions` parts, returning the cached result
    /// if this has been done before.
    ///
    /// Concurrent calls for the same path and division count share a single
    /// computation. The returned slices may be fewer than `divisions` if some of
    /// them couldn't be written; use each descriptor's slice number rather than
    /// its position.
    ///
    /// Slice files are named after the source's file stem only. Slicing
    /// `a/click.wav` and `b/click.wav` with the same `divisions` writes to the
    /// same files, so the earlier result's descriptors end up pointing at the
    /// later source's audio. Give sources distinct file names if both need to be
    /// sliced the same way.
    pub async fn slice(
        &self,
        path: impl AsRef<Path>,
        divisions: u32,
    ) -> Result<Arc<[SliceDescriptor]>, SliceError> {
        let path = path.as_ref();
        if divisions == 0 {
            return Err(SliceError::InvalidDivisions);
        }
        if let Some(slices) = self.inner.cache.get(path, divisions) {
            debug!(path = ?path, divisions, "Using cached slices");
            return Ok(slices);
        }

        let key = SliceKey::new(path, divisions);
        let in_flight = Arc::clone(
            self.inner
                .in_flight
                .lock()
                .entry(key.clone())
                .or_default(),
        );

        let result = in_flight
            .get_or_try_init(|| self.run_blocking(path.to_path_buf(), divisions))
            .await
            .cloned();

        let mut requests = self.inner.in_flight.lock();
        if requests
            .get(&key)
            .is_some_and(|current| Arc::ptr_eq(current, &in_flight))
        {
            requests.remove(&key);
        }

        result
    }

    /// Slices the file on the calling thread. Unlike [`Slicer::slice`], concurrent
    /// calls for the same key are not merged.
    pub fn slice_blocking(
        &self,
        path: impl AsRef<Path>,
        divisions: u32,
    ) -> Result<Arc<[SliceDescriptor]>, SliceError> {
        if divisions == 0 {
            return Err(SliceError::InvalidDivisions);
        }
        self.inner.slice_and_cache(path.as_ref(), divisions)
    }

    /// Returns the file for the given 1-based slice, or None if it isn't available.
    pub fn resolve_slice_file(
        &self,
        path: impl AsRef<Path>,
        divisions: u32,
        slice_number: u32,
    ) -> Option<PathBuf> {
        self.inner
            .cache
            .resolve_slice_file(path.as_ref(), divisions, slice_number)
    }

    pub fn cache(&self) -> &SliceCache {
        &self.inner.cache
    }

    pub fn temp_area(&self) -> &TempArea {
        &self.inner.temp_area
    }

    /// Forgets every cached result. Slice files stay on disk until cleaned up.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// Clears the cache and removes every slice file. The instance directory is
    /// removed as well if this is the last handle to the slicer; otherwise it goes
    /// when the last clone is dropped.
    pub fn shutdown(self) -> Result<(), SliceError> {
        self.inner.cache.clear();
        self.inner.temp_area.cleanup();

        match Arc::try_unwrap(self.inner) {
            Ok(inner) => inner.temp_area.release(),
            Err(_) => {
                debug!("Slicer still shared, leaving slice directory to the last handle");
                Ok(())
            }
        }
    }

    async fn run_blocking(
        &self,
        path: PathBuf,
        divisions: u32,
    ) -> Result<Arc<[SliceDescriptor]>, SliceError> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.slice_and_cache(&path, divisions))
            .await
            .map_err(|e| SliceError::Task(e.to_string()))?
    }
}

impl SlicerInner {
    fn slice_and_cache(
        &self,
        path: &Path,
        divisions: u32,
    ) -> Result<Arc<[SliceDescriptor]>, SliceError> {
        // Another request may have finished between the caller's lookup and now.
        if let Some(slices) = self.cache.get(path, divisions) {
            return Ok(slices);
        }

        let audio = decode_file(path)?;
        info!(
            path = ?path,
            divisions,
            channels = audio.channel_count(),
            sample_rate = audio.sample_rate(),
            bit_depth = %audio.bit_depth(),
            duration_ms = audio.duration_ms(),
            "Slicing audio"
        );

        let mut slices = Vec::with_capacity(divisions as usize);
        let mut failed = Vec::new();
        let ranges = slice_ranges(audio.total_samples(), divisions);
        for (slice_number, range) in (1..=divisions).zip(ranges) {
            match self.write_slice(path, &audio, range, slice_number, divisions) {
                Ok(slice) => {
                    debug!(
                        slice = slice_number,
                        start = range.start,
                        end = range.end,
                        file = ?slice.path(),
                        "Slice created"
                    );
                    slices.push(slice);
                }
                Err(e) => {
                    warn!(
                        path = ?path,
                        slice = slice_number,
                        divisions,
                        err = %e,
                        "Slice failed, skipping"
                    );
                    failed.push(slice_number);
                }
            }
        }

        let slices: Arc<[SliceDescriptor]> = slices.into();
        if failed.is_empty() {
            self.cache.set(path, divisions, Arc::clone(&slices));
            info!(path = ?path, divisions, "Slicing complete");
            return Ok(slices);
        }

        match self.partial_policy {
            PartialSlicePolicy::Retry => {
                warn!(
                    path = ?path,
                    divisions,
                    failed = ?failed,
                    "Incomplete slices will not be cached"
                );
                Ok(slices)
            }
            PartialSlicePolicy::Cache => {
                warn!(path = ?path, divisions, failed = ?failed, "Caching incomplete slices");
                self.cache.set(path, divisions, Arc::clone(&slices));
                Ok(slices)
            }
            PartialSlicePolicy::Fail => Err(SliceError::Incomplete {
                path: path.to_path_buf(),
                failed,
            }),
        }
    }

    /// Extracts, encodes and writes one slice.
    fn write_slice(
        &self,
        source: &Path,
        audio: &DecodedAudio,
        range: SliceRange,
        slice_number: u32,
        divisions: u32,
    ) -> Result<SliceDescriptor, SliceError> {
        let samples = extract(audio.samples(), range.start, range.end, audio.channel_count());
        let bytes = encode(
            &samples,
            audio.channel_count(),
            audio.sample_rate(),
            audio.bit_depth(),
        )?;

        let destination = self.temp_area.path_for(source, slice_number, divisions);
        self.temp_area.write(&destination, &bytes)?;

        Ok(SliceDescriptor::new(
            slice_number,
            destination,
            range,
            audio.sample_rate(),
        ))
    }
}

impl std::fmt::Debug for Slicer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slicer")
            .field("cache", &self.inner.cache)
            .field("temp_area", &self.inner.temp_area)
            .field("partial_policy", &self.inner.partial_policy)
            .finish()
    }
}
