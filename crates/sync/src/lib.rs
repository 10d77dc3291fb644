// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! carelog-sync: offline-first capture and synchronization of care events.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  insert   ┌─────────────────┐
//! │  Capture    │──────────►│ EventRepository │
//! │  Service    │           │     (trait)     │
//! └─────────────┘           └─────────────────┘
//!        │ unreachable               ▲
//!        ▼                           │ insert
//! ┌─────────────┐   drain   ┌─────────────────┐    signals    ┌──────────────┐
//! │   Outbox    │◄──────────│   SyncEngine    │◄──────────────│ Connectivity │
//! │  (JSONL)    │           └─────────────────┘               │   Monitor    │
//! └─────────────┘                    │                        └──────────────┘
//!                                    ▼ emit
//!                           ┌─────────────────┐
//!                           │   Dispatcher    │──► Notifier
//!                           └─────────────────┘
//! ```
//!
//! # Features
//!
//! - Direct write with outbox fallback when the event store is unreachable
//! - Provisional records with a distinct id type for queued events
//! - Serialized drains that never lose entries enqueued mid-drain
//! - Notifications dispatched off the write path with their own retries
//! - WebSocket event store client and reachability probe
//! - Injectable repository, notifier, outbox and clock for testing

mod capture;
mod config;
mod engine;
mod monitor;
mod notify;
mod outbox;
mod probe;
mod repository;
mod websocket;

pub use capture::{CaptureError, CaptureResult, CaptureService};
pub use config::{DispatchConfig, ProbeConfig, RemoteConfig};
pub use engine::{SyncEngine, SyncResult};
pub use monitor::{ConnectivityMonitor, ConnectivitySignal, NoopRefresher, ViewRefresher};
pub use notify::{DispatchHandle, Dispatcher, Notifier, NotifyError, NotifyResult};
pub use outbox::{DrainSnapshot, JsonlOutbox, MemoryOutbox, OutboxError, OutboxResult, OutboxStore, SharedOutbox};
pub use probe::{spawn_sync_schedule, ConnectivityProbe};
pub use repository::{BoxFuture, EventRepository, RepositoryError, RepositoryResult};
pub use websocket::WebSocketRepository;

#[cfg(test)]
mod test_helpers;
