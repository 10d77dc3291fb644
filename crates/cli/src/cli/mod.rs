// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use carelog_core::{EventId, EventType};

pub use args::{EventFieldArgs, QueryArgs};

/// Parse an event type, accepting the same aliases as the wire format.
fn parse_event_type(s: &str) -> Result<EventType, String> {
    EventType::from_str(s).map_err(|_| {
        let valid: Vec<_> = EventType::ALL.iter().map(|t| t.as_str()).collect();
        format!("valid types are: {}", valid.join(", "))
    })
}

/// Parse a canonical event id.
fn parse_event_id(s: &str) -> Result<EventId, String> {
    EventId::from_str(s).map_err(|_| "event ids are UUIDs".to_string())
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "carelog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first care event logging")]
#[command(
    long_about = "Offline-first care event logging.\n\n\
    Events are written to the event store when it is reachable and queued \
    locally when it is not. Queued events are delivered by 'carelog sync' \
    or automatically by 'carelog watch'."
)]
pub struct Cli {
    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Record a care event
    #[command(after_help = "\
Examples:
  carelog record drink --patient <uuid> --volume-ml 200
  carelog record med --patient <uuid> --med metformin --dose 500mg
  carelog record meal --patient <uuid> --meal oatmeal --at 2024-01-01T08:30:00Z")]
    Record {
        /// Event type (drink, med, meal, bathroom, note, mood, vital_signs, sleep, activity)
        #[arg(value_parser = parse_event_type)]
        event_type: EventType,

        /// Patient the event is about
        #[arg(long, short, value_name = "UUID")]
        patient: Uuid,

        /// Caregiver recording the event
        #[arg(long = "by", value_name = "UUID")]
        created_by: Option<Uuid>,

        #[command(flatten)]
        fields: EventFieldArgs,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Deliver queued events to the event store
    Sync {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show queue depth and event store reachability
    Status {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List events waiting in the outbox
    Pending {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Change fields of a synced event
    #[command(arg_required_else_help = true)]
    Update {
        /// Canonical event id
        #[arg(value_parser = parse_event_id)]
        id: EventId,

        #[command(flatten)]
        fields: EventFieldArgs,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Delete a synced event
    #[command(arg_required_else_help = true)]
    Delete {
        /// Canonical event id
        #[arg(value_parser = parse_event_id)]
        id: EventId,
    },

    /// List events from the event store
    List {
        #[command(flatten)]
        query: QueryArgs,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Stay running and sync whenever the event store becomes reachable
    Watch,

    /// Show the config file path and effective settings
    Config,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
