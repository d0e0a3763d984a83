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

//! In-memory cache of computed slices.
//!
//! Entries are keyed by the literal source path and division count. Paths are not
//! canonicalized, so callers need to use a consistent representation to get hits.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::slicer::SliceDescriptor;

/// Identifies one slicing of one source file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SliceKey {
    path: PathBuf,
    divisions: u32,
}

impl SliceKey {
    pub fn new(path: &Path, divisions: u32) -> Self {
        SliceKey {
            path: path.to_path_buf(),
            divisions,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn divisions(&self) -> u32 {
        self.divisions
    }
}

/// Maps (path, divisions) to the slices computed for it. Entries are never evicted.
#[derive(Default)]
pub struct SliceCache {
    entries: RwLock<HashMap<SliceKey, Arc<[SliceDescriptor]>>>,
}

impl SliceCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slices stored for the given key, if any.
    pub fn get(&self, path: &Path, divisions: u32) -> Option<Arc<[SliceDescriptor]>> {
        self.entries
            .read()
            .get(&SliceKey::new(path, divisions))
            .cloned()
    }

    /// Stores slices for the given key, replacing any previous entry.
    pub fn set(&self, path: &Path, divisions: u32, slices: impl Into<Arc<[SliceDescriptor]>>) {
        self.entries
            .write()
            .insert(SliceKey::new(path, divisions), slices.into());
    }

    /// Returns true if slices are stored for the given key.
    pub fn has(&self, path: &Path, divisions: u32) -> bool {
        self.entries
            .read()
            .contains_key(&SliceKey::new(path, divisions))
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns the file for the given 1-based slice number, or None if the source
    /// hasn't been sliced that way or the slice doesn't exist.
    ///
    /// Slices are matched by their own number rather than their position, as a
    /// cached set may be missing slices that failed to write.
    pub fn resolve_slice_file(
        &self,
        path: &Path,
        divisions: u32,
        slice_number: u32,
    ) -> Option<PathBuf> {
        if slice_number == 0 || slice_number > divisions {
            return None;
        }

        let entries = self.entries.read();
        entries
            .get(&SliceKey::new(path, divisions))?
            .iter()
            .find(|slice| slice.slice_number() == slice_number)
            .map(|slice| slice.path().to_path_buf())
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl std::fmt::Debug for SliceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliceCache")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slicer::SliceRange;

    fn descriptors(source: &str, numbers: &[u32], divisions: u32) -> Vec<SliceDescriptor> {
        numbers
            .iter()
            .map(|&n| {
                SliceDescriptor::new(
                    n,
                    PathBuf::from(format!("/tmp/{}_slice{}_of_{}.wav", source, n, divisions)),
                    SliceRange {
                        start: (n as usize - 1) * 10,
                        end: n as usize * 10,
                    },
                    44100,
                )
            })
            .collect()
    }

    #[test]
    fn test_get_and_set() {
        let cache = SliceCache::new();
        let path = Path::new("/songs/loop.wav");
        assert!(cache.get(path, 4).is_none());
        assert!(!cache.has(path, 4));

        cache.set(path, 4, descriptors("loop", &[1, 2, 3, 4], 4));
        assert!(cache.has(path, 4));
        assert_eq!(cache.get(path, 4).unwrap().len(), 4);

        // Same path, different division count is a separate entry.
        assert!(!cache.has(path, 2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_overwrites() {
        let cache = SliceCache::new();
        let path = Path::new("/songs/loop.wav");
        cache.set(path, 2, descriptors("first", &[1, 2], 2));
        cache.set(path, 2, descriptors("second", &[1, 2], 2));

        assert_eq!(
            cache.resolve_slice_file(path, 2, 1),
            Some(PathBuf::from("/tmp/second_slice1_of_2.wav"))
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_paths_are_not_canonicalized() {
        let cache = SliceCache::new();
        cache.set(Path::new("/songs/loop.wav"), 2, descriptors("loop", &[1, 2], 2));
        assert!(!cache.has(Path::new("/songs/../songs/loop.wav"), 2));
    }

    #[test]
    fn test_resolve_slice_file_bounds() {
        let cache = SliceCache::new();
        let path = Path::new("/songs/loop.wav");
        cache.set(path, 3, descriptors("loop", &[1, 2, 3], 3));

        for n in 1..=3 {
            assert_eq!(
                cache.resolve_slice_file(path, 3, n),
                Some(PathBuf::from(format!("/tmp/loop_slice{}_of_3.wav", n)))
            );
        }
        assert_eq!(cache.resolve_slice_file(path, 3, 0), None);
        assert_eq!(cache.resolve_slice_file(path, 3, 4), None);
        assert_eq!(cache.resolve_slice_file(path, 5, 1), None);
        assert_eq!(cache.resolve_slice_file(Path::new("/other.wav"), 3, 1), None);
    }

    #[test]
    fn test_resolve_slice_file_with_missing_slices() {
        let cache = SliceCache::new();
        let path = Path::new("/songs/loop.wav");
        cache.set(path, 4, descriptors("loop", &[1, 3, 4], 4));

        assert!(cache.resolve_slice_file(path, 4, 2).is_none());
        assert_eq!(
            cache.resolve_slice_file(path, 4, 4),
            Some(PathBuf::from("/tmp/loop_slice4_of_4.wav"))
        );
    }

    #[test]
    fn test_clear() {
        let cache = SliceCache::new();
        cache.set(Path::new("/a.wav"), 1, descriptors("a", &[1], 1));
        cache.set(Path::new("/b.wav"), 2, descriptors("b", &[1, 2], 2));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.resolve_slice_file(Path::new("/a.wav"), 1, 1).is_none());
    }
}
