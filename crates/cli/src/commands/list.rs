// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use carelog_core::EventQuery;

use crate::cli::{OutputFormat, QueryArgs};
use crate::display::format_event_line;
use crate::error::Result;

use super::{parse_timestamp, Services};

/// List events from the event store.
pub async fn run(services: &Services, args: QueryArgs, output: OutputFormat) -> Result<()> {
    let query = build_query(args)?;
    let events = services.capture.query(query).await?;

    match output {
        OutputFormat::Text => {
            if events.is_empty() {
                println!("No events");
            }
            for event in &events {
                println!("{}", format_event_line(event));
            }
        }
        OutputFormat::Json => {
            for event in &events {
                println!("{}", serde_json::to_string(event)?);
            }
        }
    }
    Ok(())
}

pub(crate) fn build_query(args: QueryArgs) -> Result<EventQuery> {
    Ok(EventQuery {
        patient_id: args.patient,
        event_type: args.event_type,
        since: args.since.as_deref().map(parse_timestamp).transpose()?,
        limit: args.limit,
    })
}
