// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Post-write notifications.
//!
//! Writers never call the [`Notifier`] themselves. They emit the written event
//! through a [`DispatchHandle`]; a dedicated [`Dispatcher`] task delivers it
//! with its own retry policy. A notification failure therefore can never be
//! mistaken for, or roll back, the write that caused it.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use carelog_core::CareEvent;

use crate::config::DispatchConfig;
use crate::repository::BoxFuture;

/// Error type for notification delivery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Result type for notification delivery.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Delivers a notification about a successfully written event.
pub trait Notifier: Send + Sync {
    fn notify<'a>(&'a self, event: &'a CareEvent) -> BoxFuture<'a, NotifyResult<()>>;
}

enum Dispatch {
    Event(Box<CareEvent>),
    Flush(oneshot::Sender<()>),
}

/// Sending side of the dispatcher queue. Cheap to clone.
#[derive(Clone)]
pub struct DispatchHandle {
    tx: mpsc::UnboundedSender<Dispatch>,
}

impl DispatchHandle {
    /// Queue a notification for `event`. Never blocks and never fails.
    pub fn emit(&self, event: CareEvent) {
        let id = event.id;
        if self.tx.send(Dispatch::Event(Box::new(event))).is_err() {
            warn!(event = %id, "notification dispatcher stopped, dropping notification");
        }
    }

    /// Wait until every notification emitted before this call was attempted.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Dispatch::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

/// Background task that drains the dispatch queue into a [`Notifier`].
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    config: DispatchConfig,
    rx: mpsc::UnboundedReceiver<Dispatch>,
}

impl Dispatcher {
    /// Create a dispatcher and the handle that feeds it.
    pub fn new(notifier: Arc<dyn Notifier>, config: DispatchConfig) -> (Self, DispatchHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher {
            notifier,
            config,
            rx,
        };
        (dispatcher, DispatchHandle { tx })
    }

    /// Create a dispatcher and run it on the current tokio runtime.
    pub fn spawn(
        notifier: Arc<dyn Notifier>,
        config: DispatchConfig,
    ) -> (DispatchHandle, JoinHandle<()>) {
        let (dispatcher, handle) = Self::new(notifier, config);
        (handle, tokio::spawn(dispatcher.run()))
    }

    /// Deliver notifications until every handle is dropped.
    pub async fn run(mut self) {
        while let Some(item) = self.rx.recv().await {
            match item {
                Dispatch::Event(event) => {
                    self.deliver(&event).await;
                }
                Dispatch::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        debug!("notification dispatcher stopped");
    }

    /// Try to deliver one notification, retrying with backoff.
    ///
    /// A notification that still fails after the last attempt is dropped
    /// with a warning.
    async fn deliver(&self, event: &CareEvent) {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.notifier.notify(event).await {
                Ok(()) => {
                    debug!(event = %event.id, attempt, "notification delivered");
                    return;
                }
                Err(e) if attempt < max_attempts => {
                    debug!(event = %event.id, attempt, "notification failed, retrying: {}", e);
                    tokio::time::sleep(self.config.backoff(attempt)).await;
                }
                Err(e) => {
                    warn!(
                        event = %event.id,
                        attempts = attempt,
                        "giving up on notification: {}",
                        e
                    );
                }
            }
        }
    }
}
