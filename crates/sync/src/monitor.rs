// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity-driven sync.
//!
//! The monitor consumes [`ConnectivitySignal`]s and drains the outbox:
//! - on an offline → online transition, followed by a view refresh
//! - on every explicit sync request
//!
//! Where the signals come from is up to the host: a platform network
//! callback, a background task scheduler, or [`ConnectivityProbe`](crate::ConnectivityProbe).

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::engine::{SyncEngine, SyncResult};

/// Signals understood by the [`ConnectivityMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivitySignal {
    /// The device can reach the network.
    Online,
    /// The device lost the network.
    Offline,
    /// An external scheduler asked for a sync.
    SyncRequested,
}

/// Refreshes cached views after a drain delivered events.
pub trait ViewRefresher: Send + Sync {
    fn refresh(&self, result: &SyncResult);
}

/// A [`ViewRefresher`] that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRefresher;

impl ViewRefresher for NoopRefresher {
    fn refresh(&self, _result: &SyncResult) {}
}

/// Turns connectivity signals into drains.
pub struct ConnectivityMonitor {
    engine: Arc<SyncEngine>,
    refresher: Arc<dyn ViewRefresher>,
    /// Last known connectivity. Starts offline so the first `Online` drains.
    online: bool,
}

impl ConnectivityMonitor {
    pub fn new(engine: Arc<SyncEngine>, refresher: Arc<dyn ViewRefresher>) -> Self {
        ConnectivityMonitor {
            engine,
            refresher,
            online: false,
        }
    }

    /// React to one signal.
    ///
    /// Returns the drain result if the signal triggered a drain.
    pub async fn handle(&mut self, signal: ConnectivitySignal) -> Option<SyncResult> {
        match signal {
            ConnectivitySignal::Online if self.online => {
                debug!("already online, ignoring signal");
                None
            }
            ConnectivitySignal::Online => {
                self.online = true;
                info!("connectivity restored, syncing outbox");
                let result = self.engine.drain().await;
                self.refresher.refresh(&result);
                Some(result)
            }
            ConnectivitySignal::Offline => {
                if self.online {
                    info!("connectivity lost, new events will be queued");
                }
                self.online = false;
                None
            }
            ConnectivitySignal::SyncRequested => {
                debug!("sync requested");
                let result = self.engine.drain().await;
                if result.success_count > 0 {
                    self.refresher.refresh(&result);
                }
                Some(result)
            }
        }
    }

    /// Handle signals until the channel closes or `cancel` fires.
    ///
    /// A drain in progress always runs to completion before cancellation is
    /// observed.
    pub async fn run(
        mut self,
        mut signals: mpsc::Receiver<ConnectivitySignal>,
        cancel: CancellationToken,
    ) {
        loop {
            let signal = tokio::select! {
                _ = cancel.cancelled() => break,
                signal = signals.recv() => signal,
            };
            match signal {
                Some(signal) => {
                    self.handle(signal).await;
                }
                None => break,
            }
        }
        debug!("connectivity monitor stopped");
    }

    /// Run the monitor on the current tokio runtime.
    pub fn spawn(
        self,
        signals: mpsc::Receiver<ConnectivitySignal>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(signals, cancel))
    }
}
