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

use hound::{SampleFormat, WavSpec};

/// The PCM encodings that can be decoded and written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// 16-bit signed integer samples.
    Int16,
    /// 24-bit signed integer samples.
    Int24,
    /// 32-bit signed integer samples.
    Int32,
    /// 32-bit IEEE float samples.
    Float32,
}

impl BitDepth {
    /// Determines the bit depth described by a WAV header, if it's one we support.
    pub fn from_wav_spec(spec: &WavSpec) -> Option<Self> {
        match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 16) => Some(BitDepth::Int16),
            (SampleFormat::Int, 24) => Some(BitDepth::Int24),
            (SampleFormat::Int, 32) => Some(BitDepth::Int32),
            (SampleFormat::Float, 32) => Some(BitDepth::Float32),
            _ => None,
        }
    }

    /// Builds a WAV header description for this bit depth.
    pub fn wav_spec(self, channels: u16, sample_rate: u32) -> WavSpec {
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample: self.bits_per_sample(),
            sample_format: self.sample_format(),
        }
    }

    /// Returns the number of bits used to store one sample.
    pub fn bits_per_sample(self) -> u16 {
        match self {
            BitDepth::Int16 => 16,
            BitDepth::Int24 => 24,
            BitDepth::Int32 | BitDepth::Float32 => 32,
        }
    }

    /// Returns the hound sample format for this bit depth.
    pub fn sample_format(self) -> SampleFormat {
        match self {
            BitDepth::Float32 => SampleFormat::Float,
            _ => SampleFormat::Int,
        }
    }

    /// Convert to string representation
    pub fn as_str(self) -> &'static str {
        match self {
            BitDepth::Int16 => "int16",
            BitDepth::Int24 => "int24",
            BitDepth::Int32 => "int32",
            BitDepth::Float32 => "float32",
        }
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
