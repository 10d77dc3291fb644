// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync engine: replays the outbox against the event store.
//!
//! A drain takes a snapshot of the outbox, inserts each entry in order, and
//! then removes the delivered entries. The entries that failed keep their
//! order, followed by anything enqueued meanwhile. Drains are serialized,
//! within a process and across processes sharing one outbox file; a drain
//! that starts while another runs waits for it and then works on what is
//! left.
//!
//! Delivery is at-least-once. If an insert commits remotely but the
//! acknowledgment is lost, the entry stays queued and is inserted again on
//! the next drain.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::notify::DispatchHandle;
use crate::outbox::SharedOutbox;
use crate::repository::EventRepository;

/// Outcome of one drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    /// Entries the event store accepted during this drain.
    pub success_count: usize,
    /// Entries from this drain's snapshot that stay queued for the next one.
    pub remaining_count: usize,
}

/// Drains the outbox into the event store.
pub struct SyncEngine {
    repository: Arc<dyn EventRepository>,
    outbox: Arc<SharedOutbox>,
    dispatch: DispatchHandle,
    /// Held for the whole read-modify-write cycle of a drain.
    drain_lock: Mutex<()>,
    /// Drain-completed signal for view refresh.
    completed_tx: broadcast::Sender<SyncResult>,
}

impl SyncEngine {
    pub fn new(
        repository: Arc<dyn EventRepository>,
        outbox: Arc<SharedOutbox>,
        dispatch: DispatchHandle,
    ) -> Self {
        let (completed_tx, _) = broadcast::channel(16);
        SyncEngine {
            repository,
            outbox,
            dispatch,
            drain_lock: Mutex::new(()),
            completed_tx,
        }
    }

    /// Subscribe to drain-completed signals.
    ///
    /// A signal is sent after every drain that had work to do.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncResult> {
        self.completed_tx.subscribe()
    }

    /// Number of events waiting in the outbox.
    pub async fn pending(&self) -> usize {
        self.outbox.count().await
    }

    /// Deliver every queued event the store will accept.
    ///
    /// Never fails: entries that could not be delivered stay queued and are
    /// retried on the next drain.
    pub async fn drain(&self) -> SyncResult {
        let _guard = self.drain_lock.lock().await;

        let drain = self.outbox.begin_drain().await;
        if drain.entries().is_empty() {
            debug!("outbox empty, nothing to sync");
            return SyncResult::default();
        }

        let total = drain.entries().len();
        let mut delivered = Vec::new();
        let mut remaining_count = 0;

        for (index, entry) in drain.entries().iter().enumerate() {
            match self.repository.insert(entry.clone()).await {
                Ok(event) => {
                    delivered.push(index);
                    debug!(event = %event.id, patient = %entry.patient_id, "queued event delivered");
                    self.dispatch.emit(event);
                }
                Err(e) => {
                    if e.is_transient() {
                        debug!(patient = %entry.patient_id, "delivery failed, will retry: {}", e);
                    } else {
                        warn!(
                            patient = %entry.patient_id,
                            event_type = %entry.event_type,
                            "event store refused queued event, keeping it: {}",
                            e
                        );
                    }
                    remaining_count += 1;
                }
            }
        }

        let result = SyncResult {
            success_count: delivered.len(),
            remaining_count,
        };
        self.outbox.commit_drain(drain, &delivered).await;

        info!(
            total,
            delivered = result.success_count,
            remaining = result.remaining_count,
            "outbox drained"
        );
        let _ = self.completed_tx.send(result);

        result
    }
}
