// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};

/// Print where the config lives and the settings in effect.
pub fn run(path: &Path, config: &Config) -> Result<()> {
    println!("{}", render(path, config)?);
    Ok(())
}

pub(crate) fn render(path: &Path, config: &Config) -> Result<String> {
    let mut effective = config.clone();
    if effective.outbox.is_none() {
        effective.outbox = config.outbox_path().ok();
    }
    let body = toml::to_string_pretty(&effective)
        .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
    let origin = if path.exists() { "" } else { " (not found, using defaults)" };
    Ok(format!("# {}{}\n{}", path.display(), origin, body))
}
