// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Event store abstraction.
//!
//! Provides a trait-based seam over the canonical remote store that enables:
//! - A real WebSocket client for production
//! - Mock stores for unit testing

use std::future::Future;
use std::pin::Pin;

use uuid::Uuid;

use carelog_core::{CareEvent, CareEventInsert, CareEventPatch, EventQuery};

/// Boxed future returned by the object-safe async traits in this crate.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error type for event store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// The store could not be reached or the connection broke.
    #[error("network error: {0}")]
    Network(String),

    /// The store did not answer in time.
    #[error("request timed out")]
    Timeout,

    /// The store refused the payload.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The caller is not allowed to perform the request.
    #[error("not authorized: {0}")]
    Auth(String),

    /// The referenced event does not exist.
    #[error("event not found: {0}")]
    NotFound(String),

    /// The store answered with something this client does not understand.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl RepositoryError {
    /// Returns true for failures that may succeed if retried later unchanged.
    ///
    /// Only these are queued by capture; everything else is final.
    pub fn is_transient(&self) -> bool {
        matches!(self, RepositoryError::Network(_) | RepositoryError::Timeout)
    }
}

/// Result type for event store operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// The canonical remote store for care events.
///
/// Inserts are plain inserts: there is no deduplication key, so replaying an
/// insert whose acknowledgment was lost creates a second record.
pub trait EventRepository: Send + Sync {
    /// Store a new event and return it with its canonical id.
    fn insert(&self, event: CareEventInsert) -> BoxFuture<'_, RepositoryResult<CareEvent>>;

    /// Patch an existing event.
    fn update(&self, id: Uuid, patch: CareEventPatch)
        -> BoxFuture<'_, RepositoryResult<CareEvent>>;

    /// Remove an existing event.
    fn delete(&self, id: Uuid) -> BoxFuture<'_, RepositoryResult<()>>;

    /// List events matching the query.
    fn query(&self, query: EventQuery) -> BoxFuture<'_, RepositoryResult<Vec<CareEvent>>>;

    /// Check that the store is reachable.
    fn ping(&self) -> BoxFuture<'_, RepositoryResult<()>>;
}
