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
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `MSLICE_LOG=mslice=debug`
/// to see every slice as it's written.
pub const LOG_ENV: &str = "MSLICE_LOG";

const DEFAULT_FILTER: &str = "info";

/// Installs a formatting subscriber filtered by [`LOG_ENV`]. Returns false if a
/// global subscriber was already installed.
pub fn init() -> bool {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
