// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capture path for new care events.
//!
//! `create` tries the event store first. If the store is unreachable the
//! event is queued in the outbox and a provisional record is returned in its
//! place; the sync engine delivers it later. Requests the store refuses are
//! never queued, since replaying them cannot succeed.

use std::sync::Arc;

use tracing::{debug, info, warn};

use carelog_core::{
    CareEvent, CareEventInsert, CareEventPatch, ClockSource, EventId, EventQuery, SystemClock,
};

use crate::notify::DispatchHandle;
use crate::outbox::SharedOutbox;
use crate::repository::{EventRepository, RepositoryError};

/// Error type for capture operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The input failed local validation; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] carelog_core::Error),

    /// Update and delete need a canonical id.
    #[error("event {0} has not been synced yet\n  hint: run 'carelog sync' and use the canonical id")]
    ProvisionalId(EventId),

    /// The event store refused or failed the request.
    #[error(transparent)]
    Remote(#[from] RepositoryError),
}

/// Result type for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Entry point for writing care events.
pub struct CaptureService {
    repository: Arc<dyn EventRepository>,
    outbox: Arc<SharedOutbox>,
    dispatch: DispatchHandle,
    clock: Arc<dyn ClockSource>,
}

impl CaptureService {
    pub fn new(
        repository: Arc<dyn EventRepository>,
        outbox: Arc<SharedOutbox>,
        dispatch: DispatchHandle,
    ) -> Self {
        Self::with_clock(repository, outbox, dispatch, Arc::new(SystemClock))
    }

    /// Create a service with a custom clock (for testing).
    pub fn with_clock(
        repository: Arc<dyn EventRepository>,
        outbox: Arc<SharedOutbox>,
        dispatch: DispatchHandle,
        clock: Arc<dyn ClockSource>,
    ) -> Self {
        CaptureService {
            repository,
            outbox,
            dispatch,
            clock,
        }
    }

    /// Record a new care event.
    ///
    /// Returns the canonical event when the store accepted it directly, or a
    /// provisional event (see [`CareEvent::is_provisional`]) when it was queued
    /// because the store was unreachable.
    pub async fn create(&self, input: CareEventInsert) -> CaptureResult<CareEvent> {
        input.validate()?;

        match self.repository.insert(input.clone()).await {
            Ok(event) => {
                debug!(event = %event.id, patient = %input.patient_id, "event stored");
                self.dispatch.emit(event.clone());
                Ok(event)
            }
            Err(e) if e.is_transient() => {
                self.outbox.enqueue(&input).await;
                let event = CareEvent::provisional(input, self.clock.now());
                info!(
                    event = %event.id,
                    patient = %event.details.patient_id,
                    "event store unreachable, queued for sync: {}",
                    e
                );
                Ok(event)
            }
            Err(e) => {
                warn!(patient = %input.patient_id, "event rejected: {}", e);
                Err(e.into())
            }
        }
    }

    /// Patch an event in the store. Not queued when offline.
    pub async fn update(&self, id: EventId, patch: CareEventPatch) -> CaptureResult<CareEvent> {
        let canonical = id.canonical().ok_or(CaptureError::ProvisionalId(id))?;
        Ok(self.repository.update(canonical, patch).await?)
    }

    /// Delete an event from the store. Not queued when offline.
    pub async fn delete(&self, id: EventId) -> CaptureResult<()> {
        let canonical = id.canonical().ok_or(CaptureError::ProvisionalId(id))?;
        Ok(self.repository.delete(canonical).await?)
    }

    /// List events from the store.
    pub async fn query(&self, query: EventQuery) -> CaptureResult<Vec<CareEvent>> {
        Ok(self.repository.query(query).await?)
    }

    /// Number of events waiting in the outbox.
    pub async fn pending(&self) -> usize {
        self.outbox.count().await
    }
}
