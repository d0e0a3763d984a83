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

/// Copies the per-channel sample range `[start, end)` out of an interleaved buffer.
///
/// The result is interleaved and always holds `(end - start) * channel_count`
/// samples. Positions past the end of the buffer are filled with silence.
pub fn extract(samples: &[f32], start: usize, end: usize, channel_count: u16) -> Vec<f32> {
    let channels = channel_count as usize;
    let output_len = end.saturating_sub(start) * channels;
    if output_len == 0 {
        return Vec::new();
    }

    let first = (start * channels).min(samples.len());
    let last = (end * channels).min(samples.len());

    let mut output = Vec::with_capacity(output_len);
    output.extend_from_slice(&samples[first..last]);
    output.resize(output_len, 0.0);
    output
}
