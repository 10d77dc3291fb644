// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::Utc;
use uuid::Uuid;

use carelog_core::EventType;

use crate::cli::{EventFieldArgs, OutputFormat};
use crate::display::format_event_details;
use crate::error::Result;

use super::{build_insert, Services};

/// Record a care event, queueing it when the event store is unreachable.
pub async fn run(
    services: &Services,
    event_type: EventType,
    patient: Uuid,
    created_by: Option<Uuid>,
    fields: EventFieldArgs,
    output: OutputFormat,
) -> Result<()> {
    let insert = build_insert(event_type, patient, created_by, fields, Utc::now())?;
    let event = services.capture.create(insert).await?;

    match output {
        OutputFormat::Text => println!("{}", format_event_details(&event)),
        OutputFormat::Json => println!("{}", serde_json::to_string(&event)?),
    }
    Ok(())
}
