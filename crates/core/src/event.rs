// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Care event types.
//!
//! A caregiver produces a [`CareEventInsert`]; the remote event store turns it
//! into a [`CareEvent`] with a canonical [`EventId`]. While the store is
//! unreachable the device hands out a provisional [`CareEvent`] instead, whose
//! id is the distinct [`EventId::Provisional`] variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Kind of care event being logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Fluid intake; usually carries `volume_ml`.
    Drink,
    /// Medication given; usually carries `med_name` and `med_dose`.
    Med,
    /// Meal eaten; usually carries `meal_desc`.
    Meal,
    /// Toileting; usually carries `bathroom_type`.
    Bathroom,
    /// Free-form observation.
    Note,
    /// Mood observation.
    Mood,
    /// Temperature, pulse, blood pressure and the like.
    VitalSigns,
    /// Sleep or rest period.
    Sleep,
    /// Physical or social activity.
    Activity,
}

impl EventType {
    /// Every recognized event type, in display order.
    pub const ALL: [EventType; 9] = [
        EventType::Drink,
        EventType::Med,
        EventType::Meal,
        EventType::Bathroom,
        EventType::Note,
        EventType::Mood,
        EventType::VitalSigns,
        EventType::Sleep,
        EventType::Activity,
    ];

    /// Returns the string representation used on the wire and in display.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Drink => "drink",
            EventType::Med => "med",
            EventType::Meal => "meal",
            EventType::Bathroom => "bathroom",
            EventType::Note => "note",
            EventType::Mood => "mood",
            EventType::VitalSigns => "vital_signs",
            EventType::Sleep => "sleep",
            EventType::Activity => "activity",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "drink" => Ok(EventType::Drink),
            "med" => Ok(EventType::Med),
            "meal" => Ok(EventType::Meal),
            "bathroom" => Ok(EventType::Bathroom),
            "note" => Ok(EventType::Note),
            "mood" => Ok(EventType::Mood),
            "vital_signs" | "vital-signs" | "vitals" => Ok(EventType::VitalSigns),
            "sleep" => Ok(EventType::Sleep),
            "activity" => Ok(EventType::Activity),
            _ => Err(Error::InvalidEventType(s.to_string())),
        }
    }
}

/// A care event as entered by a caregiver, before the event store has seen it.
///
/// Immutable once produced: the outbox stores and replays it byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareEventInsert {
    pub patient_id: Uuid,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub occurred_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_ml: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_dose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathroom_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
}

impl CareEventInsert {
    /// Creates an insert with no type-specific fields set.
    pub fn new(patient_id: Uuid, event_type: EventType, occurred_at: DateTime<Utc>) -> Self {
        CareEventInsert {
            patient_id,
            event_type,
            occurred_at,
            volume_ml: None,
            meal_desc: None,
            med_name: None,
            med_dose: None,
            bathroom_type: None,
            notes: None,
            created_by: None,
        }
    }

    pub fn with_volume_ml(mut self, volume_ml: i64) -> Self {
        self.volume_ml = Some(volume_ml);
        self
    }

    pub fn with_meal_desc(mut self, desc: impl Into<String>) -> Self {
        self.meal_desc = Some(desc.into());
        self
    }

    pub fn with_med(mut self, name: impl Into<String>, dose: impl Into<String>) -> Self {
        self.med_name = Some(name.into());
        self.med_dose = Some(dose.into());
        self
    }

    pub fn with_bathroom_type(mut self, kind: impl Into<String>) -> Self {
        self.bathroom_type = Some(kind.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_created_by(mut self, caregiver: Uuid) -> Self {
        self.created_by = Some(caregiver);
        self
    }

    /// Checks the preconditions for capturing this event.
    ///
    /// The event type is already constrained by [`EventType`]; what remains is
    /// a real patient reference and a sane volume.
    pub fn validate(&self) -> Result<()> {
        if self.patient_id.is_nil() {
            return Err(Error::MissingPatient);
        }
        if let Some(ml) = self.volume_ml {
            if ml < 0 {
                return Err(Error::NegativeVolume(ml));
            }
        }
        Ok(())
    }
}

/// Identity of a [`CareEvent`].
///
/// Tagged on the wire with `kind`, so a provisional id can never be read back
/// as a canonical one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventId {
    /// Assigned by the event store.
    Identified { id: Uuid },
    /// Synthesized locally when the event was queued for later delivery.
    Provisional {
        local_id: Uuid,
        enqueued_at: DateTime<Utc>,
    },
}

impl EventId {
    pub fn identified(id: Uuid) -> Self {
        EventId::Identified { id }
    }

    /// Creates a fresh provisional id stamped with the enqueue time.
    pub fn provisional(enqueued_at: DateTime<Utc>) -> Self {
        EventId::Provisional {
            local_id: Uuid::now_v7(),
            enqueued_at,
        }
    }

    /// Returns the canonical id, or `None` for provisional ids.
    pub fn canonical(&self) -> Option<Uuid> {
        match self {
            EventId::Identified { id } => Some(*id),
            EventId::Provisional { .. } => None,
        }
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, EventId::Provisional { .. })
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Identified { id } => write!(f, "{id}"),
            EventId::Provisional { local_id, .. } => write!(f, "provisional:{local_id}"),
        }
    }
}

/// Parses a canonical id only. Provisional ids have no meaning to the event
/// store and are rejected.
impl FromStr for EventId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(EventId::identified)
            .map_err(|_| Error::InvalidEventId(s.to_string()))
    }
}

/// A care event known to the event store, or provisionally known locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareEvent {
    pub id: EventId,
    #[serde(flatten)]
    pub details: CareEventInsert,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CareEvent {
    /// Creates a canonical event as returned by the event store.
    pub fn new(id: Uuid, details: CareEventInsert, created_at: DateTime<Utc>) -> Self {
        CareEvent {
            id: EventId::identified(id),
            details,
            created_at,
            updated_at: created_at,
        }
    }

    /// Synthesizes the provisional record handed out for a queued insert.
    pub fn provisional(details: CareEventInsert, now: DateTime<Utc>) -> Self {
        CareEvent {
            id: EventId::provisional(now),
            details,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.id.is_provisional()
    }
}

/// Field replacements for an existing event. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareEventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_ml: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_dose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathroom_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CareEventPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == CareEventPatch::default()
    }
}

/// Filter for listing events from the event store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    /// Only events that occurred at or after this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
