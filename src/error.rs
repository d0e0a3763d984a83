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
use std::path::PathBuf;

use crate::config::error::ConfigError;

/// Error types for slicing operations.
///
/// Format errors are fatal to a whole slicing request. Encode and IO errors raised
/// while producing an individual slice are caught by the slicer and turn into a
/// skipped slice instead.
#[derive(Debug, thiserror::Error)]
pub enum SliceError {
    #[error("Unable to read audio file {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("Unable to encode slice: {0}")]
    Encode(String),

    #[error("IO error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Division count must be greater than 0")]
    InvalidDivisions,

    #[error("Slicing {} left slices {failed:?} unwritten", .path.display())]
    Incomplete { path: PathBuf, failed: Vec<u32> },

    #[error("Slicing task did not complete: {0}")]
    Task(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
