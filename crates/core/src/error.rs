// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for carelog-core operations.

use thiserror::Error;

/// All possible errors that can occur in carelog-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid event type: '{0}'\n  hint: valid types are: drink, med, meal, bathroom, note, mood, vital_signs, sleep, activity")]
    InvalidEventType(String),

    #[error("invalid event id: '{0}'\n  hint: canonical event ids are UUIDs")]
    InvalidEventId(String),

    #[error("missing patient id\n  hint: every care event must reference a patient")]
    MissingPatient,

    #[error("invalid volume: {0} ml\n  hint: volume must not be negative")]
    NegativeVolume(i64),

    #[error("{0}")]
    InvalidInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for carelog-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
