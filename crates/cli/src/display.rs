// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use carelog_core::{CareEvent, CareEventInsert};
use carelog_sync::SyncResult;

/// Short human summary of the type-specific fields of an event.
///
/// Fields are listed in a fixed order and joined with `, `. Returns an empty
/// string when no type-specific field is set.
pub fn event_summary(details: &CareEventInsert) -> String {
    let mut parts = Vec::new();
    if let Some(ml) = details.volume_ml {
        parts.push(format!("{} ml", ml));
    }
    if let Some(meal) = &details.meal_desc {
        parts.push(meal.clone());
    }
    match (&details.med_name, &details.med_dose) {
        (Some(name), Some(dose)) => parts.push(format!("{} {}", name, dose)),
        (Some(name), None) => parts.push(name.clone()),
        (None, Some(dose)) => parts.push(dose.clone()),
        (None, None) => {}
    }
    if let Some(kind) = &details.bathroom_type {
        parts.push(kind.clone());
    }
    if let Some(notes) = &details.notes {
        parts.push(format!("\"{}\"", notes));
    }
    parts.join(", ")
}

/// Format a queued insert for the pending list.
///
/// ```text
/// - [drink] 2024-01-10 10:30 patient 6f1c2a9e: 200 ml
/// ```
pub fn format_insert_line(details: &CareEventInsert) -> String {
    let patient = details.patient_id.simple().to_string();
    let mut line = format!(
        "- [{}] {} patient {}",
        details.event_type,
        details.occurred_at.format("%Y-%m-%d %H:%M"),
        &patient[..8]
    );
    let summary = event_summary(details);
    if !summary.is_empty() {
        line.push_str(": ");
        line.push_str(&summary);
    }
    line
}

/// Format a single event line for list output
pub fn format_event_line(event: &CareEvent) -> String {
    format!("{} ({})", format_insert_line(&event.details), event.id)
}

/// Format event details for `record` and `update` output
pub fn format_event_details(event: &CareEvent) -> String {
    let details = &event.details;
    let mut output = Vec::new();

    output.push(format!("[{}] {}", details.event_type, event.id));
    if event.is_provisional() {
        output.push("Queued: the event store is unreachable, run 'carelog sync' later".to_string());
    }
    output.push(format!("Patient: {}", details.patient_id));
    output.push(format!(
        "Occurred: {}",
        details.occurred_at.format("%Y-%m-%d %H:%M")
    ));

    if let Some(ml) = details.volume_ml {
        output.push(format!("Volume: {} ml", ml));
    }
    if let Some(meal) = &details.meal_desc {
        output.push(format!("Meal: {}", meal));
    }
    if let Some(name) = &details.med_name {
        output.push(format!("Medication: {}", name));
    }
    if let Some(dose) = &details.med_dose {
        output.push(format!("Dose: {}", dose));
    }
    if let Some(kind) = &details.bathroom_type {
        output.push(format!("Bathroom: {}", kind));
    }
    if let Some(by) = details.created_by {
        output.push(format!("Recorded by: {}", by));
    }
    if let Some(notes) = &details.notes {
        output.push(String::new());
        output.push("Notes:".to_string());
        for line in notes.lines() {
            output.push(format!("    {}", line));
        }
    }

    output.join("\n")
}

/// Format the outcome of a drain.
pub fn format_sync_result(result: &SyncResult) -> String {
    if result.success_count == 0 && result.remaining_count == 0 {
        return "Nothing to sync".to_string();
    }
    let mut line = format!("Synced {} {}", result.success_count, plural(result.success_count));
    if result.remaining_count > 0 {
        line.push_str(&format!(", {} still queued", result.remaining_count));
    }
    line
}

/// Format the `status` report.
pub fn format_status(pending: usize, url: &str, reachable: bool) -> String {
    let state = if reachable { "reachable" } else { "unreachable" };
    format!(
        "Event store: {} ({})\nQueued: {} {}",
        url,
        state,
        pending,
        plural(pending)
    )
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "event"
    } else {
        "events"
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
