// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages between a device and the event store.
//!
//! The protocol is request/response:
//! - Client sends inserts, updates, deletes and queries tagged with a request id
//! - Server answers each request with a message carrying the same request id

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::{CareEvent, CareEventInsert, CareEventPatch, EventQuery};

/// Client-chosen correlation id echoed in the matching server response.
pub type RequestId = u64;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Store a new event. Answered by `Inserted` or `Rejected`.
    Insert {
        request_id: RequestId,
        event: CareEventInsert,
    },

    /// Patch an existing event. Answered by `Updated` or `Rejected`.
    Update {
        request_id: RequestId,
        id: Uuid,
        patch: CareEventPatch,
    },

    /// Remove an existing event. Answered by `Deleted` or `Rejected`.
    Delete { request_id: RequestId, id: Uuid },

    /// List events. Answered by `Events` or `Rejected`.
    Query {
        request_id: RequestId,
        query: EventQuery,
    },

    /// Ping message for reachability checks.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Reason the server refused a request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The payload failed server-side validation.
    Validation,
    /// The caller is not allowed to perform the request.
    Auth,
    /// The referenced event does not exist.
    NotFound,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The event was stored and assigned a canonical id.
    Inserted {
        request_id: RequestId,
        event: CareEvent,
    },

    /// The event was patched.
    Updated {
        request_id: RequestId,
        event: CareEvent,
    },

    /// The event was removed.
    Deleted { request_id: RequestId },

    /// Response to a Query request.
    Events {
        request_id: RequestId,
        events: Vec<CareEvent>,
    },

    /// The request was refused and will not succeed if retried unchanged.
    Rejected {
        request_id: RequestId,
        reason: RejectReason,
        message: String,
    },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },

    /// Error not tied to a request (e.g. undecodable frame).
    Error {
        /// Human-readable error description.
        message: String,
    },
}

impl ClientMessage {
    pub fn insert(request_id: RequestId, event: CareEventInsert) -> Self {
        ClientMessage::Insert { request_id, event }
    }

    pub fn update(request_id: RequestId, id: Uuid, patch: CareEventPatch) -> Self {
        ClientMessage::Update {
            request_id,
            id,
            patch,
        }
    }

    pub fn delete(request_id: RequestId, id: Uuid) -> Self {
        ClientMessage::Delete { request_id, id }
    }

    pub fn query(request_id: RequestId, query: EventQuery) -> Self {
        ClientMessage::Query { request_id, query }
    }

    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// Returns the correlation id a response must carry, if any.
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            ClientMessage::Insert { request_id, .. }
            | ClientMessage::Update { request_id, .. }
            | ClientMessage::Delete { request_id, .. }
            | ClientMessage::Query { request_id, .. } => Some(*request_id),
            ClientMessage::Ping { .. } => None,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    pub fn inserted(request_id: RequestId, event: CareEvent) -> Self {
        ServerMessage::Inserted { request_id, event }
    }

    pub fn updated(request_id: RequestId, event: CareEvent) -> Self {
        ServerMessage::Updated { request_id, event }
    }

    pub fn deleted(request_id: RequestId) -> Self {
        ServerMessage::Deleted { request_id }
    }

    pub fn events(request_id: RequestId, events: Vec<CareEvent>) -> Self {
        ServerMessage::Events { request_id, events }
    }

    pub fn rejected(request_id: RequestId, reason: RejectReason, message: impl Into<String>) -> Self {
        ServerMessage::Rejected {
            request_id,
            reason,
            message: message.into(),
        }
    }

    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// Returns the correlation id of a request response, if any.
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            ServerMessage::Inserted { request_id, .. }
            | ServerMessage::Updated { request_id, .. }
            | ServerMessage::Deleted { request_id }
            | ServerMessage::Events { request_id, .. }
            | ServerMessage::Rejected { request_id, .. } => Some(*request_id),
            ServerMessage::Pong { .. } | ServerMessage::Error { .. } => None,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
