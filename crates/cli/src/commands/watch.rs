// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running sync: probe the event store and drain whenever it comes back.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use carelog_sync::{spawn_sync_schedule, ConnectivityMonitor, ConnectivityProbe, ProbeConfig};

use crate::error::Result;
use crate::notifier::PrintRefresher;

use super::Services;

/// Run until Ctrl-C.
pub async fn run(services: &Services, config: &ProbeConfig) -> Result<()> {
    let cancel = CancellationToken::new();
    let tasks = start(services, config, cancel.clone());

    println!("Watching {} (Ctrl-C to stop)", services.url);
    let signal = tokio::signal::ctrl_c().await;
    info!("stopping watch");
    cancel.cancel();
    for task in tasks {
        let _ = task.await;
    }
    signal?;
    Ok(())
}

/// Spawn the probe, the optional sync schedule and the monitor.
pub(crate) fn start(
    services: &Services,
    config: &ProbeConfig,
    cancel: CancellationToken,
) -> Vec<tokio::task::JoinHandle<()>> {
    let (tx, rx) = mpsc::channel(16);
    let mut tasks = Vec::new();

    let probe = ConnectivityProbe::new(services.repository.clone(), config);
    tasks.push(probe.spawn(tx.clone(), cancel.clone()));
    if let Some(interval) = config.background_interval() {
        tasks.push(spawn_sync_schedule(interval, tx, cancel.clone()));
    }

    let monitor = ConnectivityMonitor::new(services.engine.clone(), Arc::new(PrintRefresher));
    tasks.push(monitor.spawn(rx, cancel));
    tasks
}
