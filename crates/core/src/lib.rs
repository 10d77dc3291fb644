// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! carelog-core: Shared library for offline-first care logging
//!
//! This crate provides the care event data model, the wire protocol spoken
//! with the event store, and the small persistence and clock primitives used
//! by both the sync engine and the carelog CLI.

pub mod clock;
pub mod error;
pub mod event;
pub mod jsonl;
pub mod protocol;

pub use clock::{ClockSource, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use event::{CareEvent, CareEventInsert, CareEventPatch, EventId, EventQuery, EventType};
