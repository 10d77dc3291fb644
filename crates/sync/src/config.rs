// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tunables for the sync components.
//!
//! Each struct deserializes with per-field defaults so a config file only
//! needs to mention what it changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings for the remote event store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// WebSocket URL of the event store (`ws://` or `wss://`).
    pub url: String,
    /// Max time to establish a connection, in milliseconds.
    pub connect_timeout_ms: u64,
    /// Max time to wait for the response to a single request, in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            url: "ws://127.0.0.1:7890".to_string(),
            connect_timeout_ms: 5_000,
            request_timeout_ms: 10_000,
        }
    }
}

impl RemoteConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Returns an error message if the URL is not a WebSocket URL.
    pub fn validate_url(&self) -> Option<String> {
        if self.url.starts_with("ws://") || self.url.starts_with("wss://") {
            None
        } else {
            Some(format!(
                "invalid remote URL '{}': must start with ws:// or wss://",
                self.url
            ))
        }
    }
}

/// Retry policy for post-write notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Attempts per notification, including the first (minimum 1).
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds. Doubles per retry.
    pub initial_delay_ms: u64,
    /// Upper bound on the retry delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            max_attempts: 3,
            initial_delay_ms: 200,
            max_delay_ms: 5_000,
        }
    }
}

impl DispatchConfig {
    /// Returns the delay to wait before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u64.checked_shl(retry.saturating_sub(1)).unwrap_or(u64::MAX);
        let delay = self.initial_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.max_delay_ms))
    }
}

/// Reachability probing and scheduled sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Interval between reachability checks, in milliseconds.
    pub probe_interval_ms: u64,
    /// Interval between scheduled background syncs, in milliseconds. 0 = disabled.
    pub background_interval_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            probe_interval_ms: 30_000,
            background_interval_ms: 0,
        }
    }
}

impl ProbeConfig {
    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms.max(1))
    }

    /// Returns the background sync interval, or `None` when disabled.
    pub fn background_interval(&self) -> Option<Duration> {
        (self.background_interval_ms > 0).then(|| Duration::from_millis(self.background_interval_ms))
    }
}
