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

//! PCM container handling.
//!
//! This module provides:
//! - WAV decoding into normalized, interleaved f32 buffers
//! - WAV encoding back into the source's bit depth
//! - Extraction of per-channel sample ranges from interleaved buffers

pub mod codec;
pub mod extract;
pub mod format;

pub use codec::{decode, decode_file, encode, DecodedAudio};
pub use extract::extract;
pub use format::BitDepth;
