// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Notifier and view refresher used by the CLI.
//!
//! The CLI has no push channel of its own, so a written event is reported
//! through the log. `carelog watch` prints each drain that delivered events.

use carelog_core::CareEvent;
use carelog_sync::{BoxFuture, Notifier, NotifyResult, SyncResult, ViewRefresher};
use tracing::info;

use crate::display::{event_summary, format_sync_result};

/// Reports written events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify<'a>(&'a self, event: &'a CareEvent) -> BoxFuture<'a, NotifyResult<()>> {
        Box::pin(async move {
            info!(
                event = %event.id,
                patient = %event.details.patient_id,
                kind = %event.details.event_type,
                summary = %event_summary(&event.details),
                "care event written"
            );
            Ok(())
        })
    }
}

/// Prints drain results to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintRefresher;

impl ViewRefresher for PrintRefresher {
    fn refresh(&self, result: &SyncResult) {
        println!("{}", format_sync_result(result));
    }
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
