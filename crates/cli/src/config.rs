// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User configuration.
//!
//! Configuration is stored in `$XDG_CONFIG_HOME/carelog/config.toml` and includes:
//! - `outbox`: Where queued events are kept (default: `$XDG_DATA_HOME/carelog/outbox.jsonl`)
//! - `log_file`: Optional file that receives log output instead of stderr
//! - `[remote]`, `[sync]`, `[notify]`: Tunables for the sync components
//!
//! Every field has a default, so a missing file is the same as an empty one.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use carelog_sync::{DispatchConfig, ProbeConfig, RemoteConfig};

use crate::env;
use crate::error::{Error, Result};

const APP_DIR_NAME: &str = "carelog";
const CONFIG_FILE_NAME: &str = "config.toml";
const OUTBOX_FILE_NAME: &str = "outbox.jsonl";

/// Configuration stored in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the outbox file. Defaults to the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbox: Option<PathBuf>,
    /// Log file path. Logs go to stderr when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Event store connection.
    pub remote: RemoteConfig,
    /// Reachability probing and scheduled sync for `carelog watch`.
    pub sync: ProbeConfig,
    /// Notification retry policy.
    pub notify: DispatchConfig,
}

impl Config {
    /// Loads configuration from `path`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&content).map_err(|reason| Error::ConfigParse {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parses and validates configuration from TOML text.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let config: Config = toml::from_str(content).map_err(|e| e.to_string())?;
        if let Some(msg) = config.remote.validate_url() {
            return Err(msg);
        }
        Ok(config)
    }

    /// Returns the outbox path: the configured one, or the default in the data directory.
    pub fn outbox_path(&self) -> Result<PathBuf> {
        match &self.outbox {
            Some(path) => Ok(path.clone()),
            None => data_dir()
                .map(|dir| dir.join(OUTBOX_FILE_NAME))
                .ok_or(Error::NoDataDir),
        }
    }
}

/// Resolve the config file path.
///
/// Precedence: `--config` flag, then `CARELOG_CONFIG`, then the user config directory.
pub fn config_path(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env::config_path() {
        return Ok(path);
    }
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| Error::Config("no config directory available".to_string()))
}

/// Directory for carelog's own data (`CARELOG_DATA_DIR` or `$XDG_DATA_HOME/carelog`).
pub fn data_dir() -> Option<PathBuf> {
    env::data_dir().or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME)))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
