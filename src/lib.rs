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

//! Cached audio slicing for live performance.
//!
//! A [`Slicer`] cuts a WAV file into N contiguous slices, writes each one as its
//! own playable file in a private temporary directory, and caches the result by
//! (path, N) so the same cut is only ever computed once. Playback code looks up
//! individual slices with [`Slicer::resolve_slice_file`].

pub mod audio;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod slicer;
pub mod temp_area;
#[cfg(test)]
mod testutil;

pub use cache::{SliceCache, SliceKey};
pub use config::{PartialSlicePolicy, SlicerConfig};
pub use error::SliceError;
pub use slicer::{SliceDescriptor, SliceRange, Slicer};
pub use temp_area::TempArea;
