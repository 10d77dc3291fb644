// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use carelog_core::EventId;

use crate::cli::{EventFieldArgs, OutputFormat};
use crate::display::format_event_details;
use crate::error::Result;

use super::{build_patch, Services};

/// Patch a synced event. Requires the event store to be reachable.
pub async fn update(
    services: &Services,
    id: EventId,
    fields: EventFieldArgs,
    output: OutputFormat,
) -> Result<()> {
    let patch = build_patch(fields)?;
    let event = services.capture.update(id, patch).await?;

    match output {
        OutputFormat::Text => println!("{}", format_event_details(&event)),
        OutputFormat::Json => println!("{}", serde_json::to_string(&event)?),
    }
    Ok(())
}

/// Delete a synced event. Requires the event store to be reachable.
pub async fn delete(services: &Services, id: EventId) -> Result<()> {
    services.capture.delete(id).await?;
    println!("Deleted {}", id);
    Ok(())
}
