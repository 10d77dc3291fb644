// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod config;
pub mod list;
pub mod pending;
pub mod record;
pub mod status;
pub mod sync;
pub mod update;
pub mod watch;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use carelog_core::{CareEventInsert, CareEventPatch, EventType};
use carelog_sync::{
    CaptureService, DispatchHandle, Dispatcher, EventRepository, JsonlOutbox, OutboxStore,
    SharedOutbox, SyncEngine, WebSocketRepository,
};

use crate::cli::EventFieldArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::notifier::LogNotifier;

/// The sync components wired together for one CLI invocation.
///
/// Must be created inside a tokio runtime: the notification dispatcher is
/// spawned on it.
pub struct Services {
    pub url: String,
    pub repository: Arc<dyn EventRepository>,
    pub outbox: Arc<SharedOutbox>,
    pub capture: CaptureService,
    pub engine: Arc<SyncEngine>,
    dispatch: DispatchHandle,
    dispatcher: JoinHandle<()>,
}

impl Services {
    /// Connect to the configured event store with the configured outbox.
    pub fn open(config: &Config) -> Result<Self> {
        let outbox = JsonlOutbox::open(&config.outbox_path()?)?;
        let repository = Arc::new(WebSocketRepository::new(config.remote.clone()));
        Ok(Self::with_parts(config, repository, outbox))
    }

    /// Wire the services around an explicit repository and outbox.
    pub fn with_parts(
        config: &Config,
        repository: Arc<dyn EventRepository>,
        outbox: impl OutboxStore + 'static,
    ) -> Self {
        let outbox = Arc::new(SharedOutbox::new(outbox));
        let (dispatch, dispatcher) = Dispatcher::spawn(Arc::new(LogNotifier), config.notify.clone());
        Services {
            url: config.remote.url.clone(),
            capture: CaptureService::new(repository.clone(), outbox.clone(), dispatch.clone()),
            engine: Arc::new(SyncEngine::new(
                repository.clone(),
                outbox.clone(),
                dispatch.clone(),
            )),
            repository,
            outbox,
            dispatch,
            dispatcher,
        }
    }

    /// Wait for pending notifications, then stop the dispatcher.
    pub async fn shutdown(self) {
        self.dispatch.flush().await;
        self.dispatcher.abort();
    }
}

/// Parse an RFC 3339 timestamp.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::InvalidTimestamp(s.to_string()))
}

/// Build the insert for `record` from the command-line fields.
///
/// `now` is used when `--at` is not given.
pub fn build_insert(
    event_type: EventType,
    patient: Uuid,
    created_by: Option<Uuid>,
    fields: EventFieldArgs,
    now: DateTime<Utc>,
) -> Result<CareEventInsert> {
    let occurred_at = match fields.at.as_deref() {
        Some(at) => parse_timestamp(at)?,
        None => now,
    };
    let mut insert = CareEventInsert::new(patient, event_type, occurred_at);
    insert.volume_ml = fields.volume_ml;
    insert.meal_desc = fields.meal;
    insert.med_name = fields.med;
    insert.med_dose = fields.dose;
    insert.bathroom_type = fields.bathroom;
    insert.notes = fields.notes;
    insert.created_by = created_by;
    Ok(insert)
}

/// Build the patch for `update`. At least one field must be set.
pub fn build_patch(fields: EventFieldArgs) -> Result<CareEventPatch> {
    let patch = CareEventPatch {
        occurred_at: fields.at.as_deref().map(parse_timestamp).transpose()?,
        volume_ml: fields.volume_ml,
        meal_desc: fields.meal,
        med_name: fields.med,
        med_dose: fields.dose,
        bathroom_type: fields.bathroom,
        notes: fields.notes,
    };
    if patch.is_empty() {
        return Err(Error::EmptyPatch);
    }
    Ok(patch)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
