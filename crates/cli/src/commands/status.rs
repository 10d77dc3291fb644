// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::display::format_status;
use crate::error::Result;

use super::Services;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct StatusReport {
    pub url: String,
    pub reachable: bool,
    pub pending: usize,
}

/// Show queue depth and whether the event store answers a ping.
pub async fn run(services: &Services, output: OutputFormat) -> Result<()> {
    let report = run_impl(services).await;
    match output {
        OutputFormat::Text => println!(
            "{}",
            format_status(report.pending, &report.url, report.reachable)
        ),
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
    }
    Ok(())
}

pub(crate) async fn run_impl(services: &Services) -> StatusReport {
    let reachable = match services.repository.ping().await {
        Ok(()) => true,
        Err(e) => {
            debug!("ping failed: {}", e);
            false
        }
    };
    StatusReport {
        url: services.url.clone(),
        reachable,
        pending: services.outbox.count().await,
    }
}
