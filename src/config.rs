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
use std::path::{Path, PathBuf};
use std::time::Duration;

use ::config::{Config, File, FileFormat};
use duration_string::DurationString;
use serde::Deserialize;

use self::error::ConfigError;

pub mod error;

const DEFAULT_TEMP_DIR_PREFIX: &str = "mslice";
const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(60 * 60);

/// What to do with a slicing result when some of its slices couldn't be written.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PartialSlicePolicy {
    /// Return the slices that were written, but don't cache them so the next
    /// request for the same source tries again.
    #[default]
    Retry,
    /// Return and cache the slices that were written. Later requests get the same
    /// incomplete set.
    Cache,
    /// Fail the request. Nothing is cached.
    Fail,
}

/// A YAML representation of the slicer configuration.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct SlicerConfig {
    /// Prefix for instance directory names (default: "mslice").
    temp_dir_prefix: Option<String>,

    /// Directory the instance directories are created in (default: the system temp dir).
    temp_root: Option<PathBuf>,

    /// How long a sibling instance directory must sit idle before it's reclaimed (default: 1h).
    stale_after: Option<String>,

    /// Handling of results with missing slices (default: retry).
    partial_slices: Option<PartialSlicePolicy>,
}

impl SlicerConfig {
    /// Creates a config with every value defaulted.
    pub fn new() -> SlicerConfig {
        SlicerConfig::default()
    }

    /// Parses a config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<SlicerConfig, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize()?)
    }

    /// Parses a config from a YAML file.
    pub fn from_file(path: &Path) -> Result<SlicerConfig, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from(path).format(FileFormat::Yaml))
            .build()?
            .try_deserialize()?)
    }

    pub fn with_temp_dir_prefix(mut self, prefix: &str) -> SlicerConfig {
        self.temp_dir_prefix = Some(prefix.to_string());
        self
    }

    pub fn with_temp_root(mut self, root: &Path) -> SlicerConfig {
        self.temp_root = Some(root.to_path_buf());
        self
    }

    pub fn with_stale_after(mut self, stale_after: &str) -> SlicerConfig {
        self.stale_after = Some(stale_after.to_string());
        self
    }

    pub fn with_partial_slices(mut self, policy: PartialSlicePolicy) -> SlicerConfig {
        self.partial_slices = Some(policy);
        self
    }

    /// Returns the instance directory prefix.
    pub fn temp_dir_prefix(&self) -> Result<&str, ConfigError> {
        let prefix = self
            .temp_dir_prefix
            .as_deref()
            .unwrap_or(DEFAULT_TEMP_DIR_PREFIX);
        if prefix.is_empty() || prefix.contains(['/', '\\']) {
            return Err(ConfigError::InvalidPrefix(prefix.to_string()));
        }
        Ok(prefix)
    }

    /// Returns the temp root, falling back to the system temp dir.
    pub fn temp_root(&self) -> PathBuf {
        self.temp_root.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Returns the stale directory threshold.
    pub fn stale_after(&self) -> Result<Duration, ConfigError> {
        match &self.stale_after {
            Some(stale_after) => Ok(DurationString::from_string(stale_after.clone())
                .map_err(|e| ConfigError::InvalidDuration {
                    value: stale_after.clone(),
                    reason: e.to_string(),
                })?
                .into()),
            None => Ok(DEFAULT_STALE_AFTER),
        }
    }

    /// Returns the partial result policy.
    pub fn partial_slices(&self) -> PartialSlicePolicy {
        self.partial_slices.unwrap_or_default()
    }
}
