// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use carelog_sync::SyncResult;

use crate::cli::OutputFormat;
use crate::display::format_sync_result;
use crate::error::Result;

use super::Services;

/// Drain the outbox once.
pub async fn run(services: &Services, output: OutputFormat) -> Result<()> {
    let result = run_impl(services).await;
    match output {
        OutputFormat::Text => println!("{}", format_sync_result(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string(&result)?),
    }
    Ok(())
}

pub(crate) async fn run_impl(services: &Services) -> SyncResult {
    services.engine.drain().await
}
