// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions. The variable name constants are generated
//! by `build.rs` and live in the [`vars`] submodule.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns the value of `CARELOG_CONFIG` if set.
pub fn config_path() -> Option<PathBuf> {
    non_empty(vars::CARELOG_CONFIG).map(PathBuf::from)
}

/// Returns the value of `CARELOG_DATA_DIR` if set.
pub fn data_dir() -> Option<PathBuf> {
    non_empty(vars::CARELOG_DATA_DIR).map(PathBuf::from)
}

/// Returns the log filter directive from `CARELOG_LOG` if set.
pub fn log_filter() -> Option<String> {
    non_empty(vars::CARELOG_LOG)
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
