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
use std::fmt;
use std::path::{Path, PathBuf};

use super::ranges::SliceRange;

/// Describes one slice that has been written to disk.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceDescriptor {
    /// 1-based position of the slice within its source.
    slice_number: u32,
    /// Where the slice was written.
    path: PathBuf,
    /// The source samples this slice was cut from.
    range: SliceRange,
    /// Length of the slice in milliseconds.
    duration_ms: f64,
}

impl SliceDescriptor {
    /// Creates a new slice descriptor. The duration is derived from the range length.
    pub fn new(slice_number: u32, path: PathBuf, range: SliceRange, sample_rate: u32) -> Self {
        SliceDescriptor {
            slice_number,
            path,
            range,
            duration_ms: range.sample_count() as f64 / sample_rate as f64 * 1000.0,
        }
    }

    pub fn slice_number(&self) -> u32 {
        self.slice_number
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// First source sample in the slice (inclusive, per channel).
    pub fn start_sample(&self) -> usize {
        self.range.start
    }

    /// End of the slice in the source (exclusive, per channel).
    pub fn end_sample(&self) -> usize {
        self.range.end
    }

    pub fn range(&self) -> SliceRange {
        self.range
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }
}

impl fmt::Display for SliceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} [{}, {}) {:.2}ms {}",
            self.slice_number,
            self.range.start,
            self.range.end,
            self.duration_ms,
            self.path.display()
        )
    }
}
