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

//! WAV decoding and encoding.
//!
//! Sources are decoded fully into memory as normalized f32 samples. Slices are
//! encoded back into the bit depth of the source they were cut from.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use hound::{WavReader, WavWriter};
use tracing::debug;

use super::format::BitDepth;
use crate::error::SliceError;

/// Size of a canonical WAV header, used to presize encode buffers.
const WAV_HEADER_SIZE: usize = 44;

/// A PCM file decoded into memory.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedAudio {
    /// Sample rate in Hz.
    sample_rate: u32,
    /// Number of interleaved channels.
    channel_count: u16,
    /// Encoding of the source file.
    bit_depth: BitDepth,
    /// Samples per channel.
    total_samples: usize,
    /// Interleaved samples normalized to [-1.0, 1.0].
    samples: Vec<f32>,
}

impl DecodedAudio {
    /// Returns the sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the number of channels.
    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    /// Returns the bit depth of the source.
    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    /// Returns the number of samples per channel.
    pub fn total_samples(&self) -> usize {
        self.total_samples
    }

    /// Returns the interleaved sample buffer.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Iterates over the audio one frame (one sample per channel) at a time.
    pub fn frames(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.samples.chunks_exact(self.channel_count as usize)
    }

    /// Returns the duration of the audio in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.total_samples as f64 / self.sample_rate as f64 * 1000.0
    }
}

/// Reads and decodes the WAV file at the given path.
pub fn decode_file(path: &Path) -> Result<DecodedAudio, SliceError> {
    let bytes = fs::read(path).map_err(|e| SliceError::Format {
        path: path.to_path_buf(),
        source: hound::Error::IoError(e),
    })?;
    decode(&bytes, path)
}

/// Decodes WAV bytes. The path is only used to identify the source in errors.
pub fn decode(bytes: &[u8], path: &Path) -> Result<DecodedAudio, SliceError> {
    let format_error = |source| SliceError::Format {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = WavReader::new(Cursor::new(bytes)).map_err(format_error)?;
    let spec = reader.spec();
    if spec.channels == 0 || spec.sample_rate == 0 {
        return Err(format_error(hound::Error::FormatError(
            "channel count and sample rate must be non-zero",
        )));
    }
    let bit_depth =
        BitDepth::from_wav_spec(&spec).ok_or_else(|| format_error(hound::Error::Unsupported))?;

    let mut samples = match bit_depth {
        BitDepth::Float32 => reader
            .samples::<f32>()
            .collect::<Result<Vec<f32>, hound::Error>>(),
        _ => {
            // Use i64 to avoid overflow for 32-bit samples
            let scale_factor = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|sample| sample as f32 * scale_factor))
                .collect::<Result<Vec<f32>, hound::Error>>()
        }
    }
    .map_err(format_error)?;

    // A trailing partial frame can't be addressed per channel, so drop it.
    let channels = spec.channels as usize;
    let total_samples = samples.len() / channels;
    samples.truncate(total_samples * channels);

    debug!(
        path = ?path,
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        bit_depth = %bit_depth,
        total_samples,
        "Decoded audio"
    );

    Ok(DecodedAudio {
        sample_rate: spec.sample_rate,
        channel_count: spec.channels,
        bit_depth,
        total_samples,
        samples,
    })
}

/// Encodes interleaved samples into a complete WAV file.
pub fn encode(
    samples: &[f32],
    channel_count: u16,
    sample_rate: u32,
    bit_depth: BitDepth,
) -> Result<Vec<u8>, SliceError> {
    if channel_count == 0 {
        return Err(SliceError::Encode(
            "channel count must be greater than 0".to_string(),
        ));
    }
    if samples.len() % channel_count as usize != 0 {
        return Err(SliceError::Encode(format!(
            "{} samples is not a whole number of {}-channel frames",
            samples.len(),
            channel_count
        )));
    }

    let bytes_per_sample = bit_depth.bits_per_sample() as usize / 8;
    let mut cursor = Cursor::new(Vec::with_capacity(
        WAV_HEADER_SIZE + samples.len() * bytes_per_sample,
    ));
    let encode_error = |e: hound::Error| SliceError::Encode(e.to_string());

    {
        let spec = bit_depth.wav_spec(channel_count, sample_rate);
        let mut writer = WavWriter::new(&mut cursor, spec).map_err(encode_error)?;
        match bit_depth {
            BitDepth::Float32 => {
                for &sample in samples {
                    writer.write_sample(sample).map_err(encode_error)?;
                }
            }
            BitDepth::Int16 => {
                for &sample in samples {
                    writer
                        .write_sample(quantize(sample, 16) as i16)
                        .map_err(encode_error)?;
                }
            }
            BitDepth::Int24 | BitDepth::Int32 => {
                let bits = bit_depth.bits_per_sample();
                for &sample in samples {
                    writer
                        .write_sample(quantize(sample, bits))
                        .map_err(encode_error)?;
                }
            }
        }
        writer.finalize().map_err(encode_error)?;
    }

    Ok(cursor.into_inner())
}

/// Scales a normalized sample to a signed integer of the given width, clamping to
/// the representable range.
fn quantize(sample: f32, bits: u16) -> i32 {
    let full_scale = (1i64 << (bits - 1)) as f64;
    (sample as f64 * full_scale)
        .round()
        .clamp(-full_scale, full_scale - 1.0) as i32
}
