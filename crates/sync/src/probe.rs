// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Background signal sources for the connectivity monitor.
//!
//! Hosts without a platform connectivity callback can poll the event store
//! instead. The probe pings it on an interval and reports transitions only;
//! the scheduler issues periodic sync requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ProbeConfig;
use crate::monitor::ConnectivitySignal;
use crate::repository::EventRepository;

/// Periodic reachability check against the event store.
pub struct ConnectivityProbe {
    repository: Arc<dyn EventRepository>,
    interval: Duration,
    /// Last observed reachability, for lock-free status queries.
    reachable: Arc<AtomicBool>,
}

impl ConnectivityProbe {
    pub fn new(repository: Arc<dyn EventRepository>, config: &ProbeConfig) -> Self {
        ConnectivityProbe {
            repository,
            interval: config.probe_interval(),
            reachable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared flag tracking the last probe result.
    pub fn reachable(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.reachable)
    }

    /// Probe until cancelled or the receiver is dropped.
    ///
    /// The first probe runs immediately and always reports its result.
    pub async fn run(self, signals: mpsc::Sender<ConnectivitySignal>, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut last: Option<bool> = None;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ticker.tick() => {}
            }

            let up = tokio::select! {
                _ = cancel.cancelled() => return,
                result = self.repository.ping() => match result {
                    Ok(()) => true,
                    Err(e) => {
                        debug!("event store unreachable: {}", e);
                        false
                    }
                },
            };
            self.reachable.store(up, Ordering::Release);

            if last == Some(up) {
                continue;
            }
            last = Some(up);

            let signal = if up {
                ConnectivitySignal::Online
            } else {
                ConnectivitySignal::Offline
            };
            if !send_or_cancel(&signals, signal, &cancel).await {
                return;
            }
        }
    }

    /// Run the probe on the current tokio runtime.
    pub fn spawn(
        self,
        signals: mpsc::Sender<ConnectivitySignal>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(signals, cancel))
    }
}

/// Issue a [`ConnectivitySignal::SyncRequested`] every `interval`.
///
/// The first request is sent one full interval after spawning.
pub fn spawn_sync_schedule(
    interval: Duration,
    signals: mpsc::Sender<ConnectivitySignal>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let interval = interval.max(Duration::from_millis(1));
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + interval;
        let mut ticker = tokio::time::interval_at(start, interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ticker.tick() => {}
            }
            if !send_or_cancel(&signals, ConnectivitySignal::SyncRequested, &cancel).await {
                return;
            }
        }
    })
}

/// Returns false once the receiver is gone or `cancel` fired while waiting
/// for channel capacity.
async fn send_or_cancel(
    signals: &mpsc::Sender<ConnectivitySignal>,
    signal: ConnectivitySignal,
    cancel: &CancellationToken,
) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        sent = signals.send(signal) => sent.is_ok(),
    }
}
