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

/// A per-channel sample range, `start` inclusive and `end` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SliceRange {
    pub start: usize,
    pub end: usize,
}

impl SliceRange {
    /// Returns the number of samples per channel in the range.
    pub fn sample_count(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// Divides `total_samples` into `divisions` contiguous ranges.
///
/// Every range is `total_samples / divisions` long except the last, which also
/// takes the remainder. When there are fewer samples than divisions, the leading
/// ranges are empty and the last one covers everything.
pub fn slice_ranges(total_samples: usize, divisions: u32) -> Vec<SliceRange> {
    if divisions == 0 {
        return Vec::new();
    }

    let divisions = divisions as usize;
    let per_slice = total_samples / divisions;
    (0..divisions)
        .map(|i| SliceRange {
            start: i * per_slice,
            end: if i == divisions - 1 {
                total_samples
            } else {
                (i + 1) * per_slice
            },
        })
        .collect()
}
