// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::OutputFormat;
use crate::display::format_insert_line;
use crate::error::Result;

use super::Services;

/// List queued events in delivery order.
pub async fn run(services: &Services, output: OutputFormat) -> Result<()> {
    let entries = services.outbox.entries().await;

    match output {
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No queued events");
            }
            for entry in &entries {
                println!("{}", format_insert_line(entry));
            }
        }
        OutputFormat::Json => {
            // One object per line, same shape as the outbox file
            for entry in &entries {
                println!("{}", serde_json::to_string(entry)?);
            }
        }
    }
    Ok(())
}
