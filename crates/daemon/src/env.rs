// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

/// Default log filter when `LULL_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.is_empty())
}

/// Compositor socket: SWAYSOCK > I3SOCK
pub fn socket_path() -> Option<PathBuf> {
    non_empty("SWAYSOCK").or_else(|| non_empty("I3SOCK")).map(PathBuf::from)
}

/// Settings file: LULL_CONFIG > $XDG_CONFIG_HOME/lull/config.toml
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = non_empty("LULL_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("lull").join("config.toml"))
}

/// Log filter directives (`EnvFilter` syntax)
pub fn log_filter() -> String {
    non_empty("LULL_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
