// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` so `record` and
//! `update` accept the same event fields.

use clap::Args;

/// Type-specific fields of a care event.
#[derive(Args, Clone, Debug, Default)]
pub struct EventFieldArgs {
    /// When it happened (RFC 3339). Defaults to now for `record`
    #[arg(long, value_name = "TIME")]
    pub at: Option<String>,

    /// Fluid volume in milliliters
    #[arg(long, value_name = "ML", allow_negative_numbers = true)]
    pub volume_ml: Option<i64>,

    /// What was eaten
    #[arg(long, value_name = "DESC")]
    pub meal: Option<String>,

    /// Medication name
    #[arg(long, value_name = "NAME")]
    pub med: Option<String>,

    /// Medication dose (e.g. "500mg")
    #[arg(long)]
    pub dose: Option<String>,

    /// Bathroom visit kind (e.g. "urine", "bowel")
    #[arg(long, value_name = "KIND")]
    pub bathroom: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

/// Filters for `list`.
#[derive(Args, Clone, Debug, Default)]
pub struct QueryArgs {
    /// Only events for this patient
    #[arg(long, short, value_name = "UUID")]
    pub patient: Option<uuid::Uuid>,

    /// Only events of this type
    #[arg(long = "type", short = 't', value_name = "TYPE", value_parser = super::parse_event_type)]
    pub event_type: Option<carelog_core::EventType>,

    /// Only events at or after this time (RFC 3339)
    #[arg(long, value_name = "TIME")]
    pub since: Option<String>,

    /// Maximum number of results
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}
