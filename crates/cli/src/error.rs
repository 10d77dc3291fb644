// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use thiserror::Error;

use carelog_sync::{CaptureError, OutboxError};

/// All possible errors that can occur in the carelog CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {reason}\n  hint: see 'carelog config' for the expected layout", path.display())]
    ConfigParse { path: PathBuf, reason: String },

    #[error("no data directory available\n  hint: set 'outbox' in the config file or CARELOG_DATA_DIR")]
    NoDataDir,

    #[error("invalid timestamp '{0}'\n  hint: use RFC 3339, e.g. 2024-01-01T10:00:00Z")]
    InvalidTimestamp(String),

    #[error("nothing to update\n  hint: pass at least one field, e.g. --volume-ml 250")]
    EmptyPatch,

    #[error(transparent)]
    Core(#[from] carelog_core::Error),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("outbox error: {0}")]
    Outbox(#[from] OutboxError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for carelog CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
