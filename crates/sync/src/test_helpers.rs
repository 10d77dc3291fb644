// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]
#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use carelog_core::protocol::{ClientMessage, RejectReason, ServerMessage};
use carelog_core::{
    CareEvent, CareEventInsert, CareEventPatch, EventQuery, EventType, FixedClock,
};

use crate::capture::CaptureService;
use crate::config::DispatchConfig;
use crate::engine::SyncEngine;
use crate::notify::{DispatchHandle, Dispatcher, Notifier, NotifyError, NotifyResult};
use crate::outbox::{MemoryOutbox, OutboxStore, SharedOutbox};
use crate::repository::{BoxFuture, EventRepository, RepositoryError, RepositoryResult};

/// A fixed instant on 2024-01-01.
pub fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
}

pub fn patient(n: u128) -> Uuid {
    Uuid::from_u128(0x6f1c_2a9e_0000_4000_8000_0000_0000_0000 + n)
}

/// Apply a patch to a stored event the way the event store does.
pub fn apply_patch(patch: &CareEventPatch, event: &mut CareEvent, now: DateTime<Utc>) {
    let details = &mut event.details;
    if let Some(at) = patch.occurred_at {
        details.occurred_at = at;
    }
    if let Some(ml) = patch.volume_ml {
        details.volume_ml = Some(ml);
    }
    if let Some(ref v) = patch.meal_desc {
        details.meal_desc = Some(v.clone());
    }
    if let Some(ref v) = patch.med_name {
        details.med_name = Some(v.clone());
    }
    if let Some(ref v) = patch.med_dose {
        details.med_dose = Some(v.clone());
    }
    if let Some(ref v) = patch.bathroom_type {
        details.bathroom_type = Some(v.clone());
    }
    if let Some(ref v) = patch.notes {
        details.notes = Some(v.clone());
    }
    event.updated_at = now;
}

/// True if `event` passes every filter set on `query`. `limit` is ignored.
pub fn query_matches(query: &EventQuery, event: &CareEvent) -> bool {
    let details = &event.details;
    query.patient_id.map_or(true, |p| details.patient_id == p)
        && query.event_type.map_or(true, |t| details.event_type == t)
        && query.since.map_or(true, |s| details.occurred_at >= s)
}

/// Create a drink event for patient `n` with the given volume.
pub fn make_insert(n: u128, volume_ml: i64) -> CareEventInsert {
    CareEventInsert::new(patient(n), EventType::Drink, at(10, 0, 0)).with_volume_ml(volume_ml)
}

type FailRule = Box<dyn Fn(&CareEventInsert) -> Option<RepositoryError> + Send + Sync>;

/// Lets a test hold inserts in flight.
///
/// Every insert signals `entered`, then waits for `release`.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

/// In-memory event store with scripted failures.
pub struct MockRepository {
    fail_rule: Mutex<Option<FailRule>>,
    /// Every insert attempt, in call order.
    attempts: Mutex<Vec<CareEventInsert>>,
    stored: Mutex<Vec<CareEvent>>,
    /// Responses returned by successful inserts before falling back to generated ones.
    scripted: Mutex<VecDeque<CareEvent>>,
    gate: Mutex<Option<Arc<Gate>>>,
    delay: Mutex<Option<Duration>>,
    reachable: AtomicBool,
    pings: AtomicUsize,
}

impl MockRepository {
    /// A store that accepts everything.
    pub fn new() -> Self {
        MockRepository {
            fail_rule: Mutex::new(None),
            attempts: Mutex::new(Vec::new()),
            stored: Mutex::new(Vec::new()),
            scripted: Mutex::new(VecDeque::new()),
            gate: Mutex::new(None),
            delay: Mutex::new(None),
            reachable: AtomicBool::new(true),
            pings: AtomicUsize::new(0),
        }
    }

    /// A store that fails every request with a network error.
    pub fn offline() -> Self {
        let repo = Self::new();
        repo.go_offline();
        repo
    }

    pub fn go_offline(&self) {
        self.reachable.store(false, Ordering::SeqCst);
        self.fail_with(|_| Some(RepositoryError::Network("connection refused".into())));
    }

    pub fn go_online(&self) {
        self.reachable.store(true, Ordering::SeqCst);
        *self.fail_rule.lock().unwrap() = None;
    }

    /// Fail inserts for which `rule` returns an error.
    pub fn fail_with(
        &self,
        rule: impl Fn(&CareEventInsert) -> Option<RepositoryError> + Send + Sync + 'static,
    ) {
        *self.fail_rule.lock().unwrap() = Some(Box::new(rule));
    }

    pub fn push_response(&self, event: CareEvent) {
        self.scripted.lock().unwrap().push_back(event);
    }

    pub fn set_gate(&self, gate: Arc<Gate>) {
        *self.gate.lock().unwrap() = Some(gate);
    }

    /// Make every insert take `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn attempts(&self) -> Vec<CareEventInsert> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    pub fn stored(&self) -> Vec<CareEvent> {
        self.stored.lock().unwrap().clone()
    }

    pub fn ping_count(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }

    pub fn seed(&self, event: CareEvent) {
        self.stored.lock().unwrap().push(event);
    }

    fn check_reachable(&self) -> RepositoryResult<()> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RepositoryError::Network("connection refused".into()))
        }
    }
}

impl EventRepository for MockRepository {
    fn insert(&self, event: CareEventInsert) -> BoxFuture<'_, RepositoryResult<CareEvent>> {
        Box::pin(async move {
            self.attempts.lock().unwrap().push(event.clone());

            let gate = self.gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                gate.entered.notify_one();
                gate.release.notified().await;
            }
            let delay = *self.delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let failure = self
                .fail_rule
                .lock()
                .unwrap()
                .as_ref()
                .and_then(|rule| rule(&event));
            if let Some(err) = failure {
                return Err(err);
            }

            let scripted = self.scripted.lock().unwrap().pop_front();
            let stored = scripted.unwrap_or_else(|| CareEvent::new(Uuid::new_v4(), event, at(10, 0, 5)));
            self.stored.lock().unwrap().push(stored.clone());
            Ok(stored)
        })
    }

    fn update(
        &self,
        id: Uuid,
        patch: CareEventPatch,
    ) -> BoxFuture<'_, RepositoryResult<CareEvent>> {
        Box::pin(async move {
            self.check_reachable()?;
            let mut stored = self.stored.lock().unwrap();
            let event = stored
                .iter_mut()
                .find(|e| e.id.canonical() == Some(id))
                .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
            apply_patch(&patch, event, at(12, 0, 0));
            Ok(event.clone())
        })
    }

    fn delete(&self, id: Uuid) -> BoxFuture<'_, RepositoryResult<()>> {
        Box::pin(async move {
            self.check_reachable()?;
            let mut stored = self.stored.lock().unwrap();
            let before = stored.len();
            stored.retain(|e| e.id.canonical() != Some(id));
            if stored.len() == before {
                return Err(RepositoryError::NotFound(id.to_string()));
            }
            Ok(())
        })
    }

    fn query(&self, query: EventQuery) -> BoxFuture<'_, RepositoryResult<Vec<CareEvent>>> {
        Box::pin(async move {
            self.check_reachable()?;
            let stored = self.stored.lock().unwrap();
            let matching = stored.iter().filter(|e| query_matches(&query, e)).cloned();
            Ok(match query.limit {
                Some(limit) => matching.take(limit).collect(),
                None => matching.collect(),
            })
        })
    }

    fn ping(&self) -> BoxFuture<'_, RepositoryResult<()>> {
        Box::pin(async move {
            self.pings.fetch_add(1, Ordering::SeqCst);
            self.check_reachable()
        })
    }
}

/// Notifier that records calls and can fail a number of times first.
#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<CareEvent>>,
    failures_left: AtomicUsize,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` calls.
    pub fn failing(n: usize) -> Self {
        RecordingNotifier {
            calls: Mutex::new(Vec::new()),
            failures_left: AtomicUsize::new(n),
        }
    }

    /// Every call made, including failed ones.
    pub fn calls(&self) -> Vec<CareEvent> {
        self.calls.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify<'a>(&'a self, event: &'a CareEvent) -> BoxFuture<'a, NotifyResult<()>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(event.clone());
            let fail = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if fail {
                Err(NotifyError::Delivery("push gateway unavailable".into()))
            } else {
                Ok(())
            }
        })
    }
}

/// Fully wired capture + sync stack over a mock store and an in-memory outbox.
pub struct Harness {
    pub repo: Arc<MockRepository>,
    pub notifier: Arc<RecordingNotifier>,
    pub outbox: Arc<SharedOutbox>,
    pub dispatch: DispatchHandle,
    pub clock: Arc<FixedClock>,
    pub capture: CaptureService,
    pub engine: Arc<SyncEngine>,
}

impl Harness {
    pub fn new(repo: MockRepository) -> Self {
        Self::with_store(repo, MemoryOutbox::new())
    }

    pub fn with_store(repo: MockRepository, store: impl OutboxStore + 'static) -> Self {
        Self::build(repo, RecordingNotifier::new(), store)
    }

    pub fn build(
        repo: MockRepository,
        notifier: RecordingNotifier,
        store: impl OutboxStore + 'static,
    ) -> Self {
        let repo = Arc::new(repo);
        let notifier = Arc::new(notifier);
        let outbox = Arc::new(SharedOutbox::new(store));
        let clock = Arc::new(FixedClock::new(at(10, 0, 1)));
        let config = DispatchConfig {
            max_attempts: 3,
            initial_delay_ms: 1,
            max_delay_ms: 5,
        };
        let (dispatch, _task) = Dispatcher::spawn(notifier.clone(), config);

        let capture = CaptureService::with_clock(
            repo.clone(),
            outbox.clone(),
            dispatch.clone(),
            clock.clone(),
        );
        let engine = Arc::new(SyncEngine::new(repo.clone(), outbox.clone(), dispatch.clone()));

        Harness {
            repo,
            notifier,
            outbox,
            dispatch,
            clock,
            capture,
            engine,
        }
    }
}

/// Decides the frames sent back for one request. `None` closes the connection.
pub type ServerHandler = Arc<dyn Fn(ClientMessage) -> Option<Vec<ServerMessage>> + Send + Sync>;

/// In-process WebSocket event store for exercising the real client.
pub struct TestServer {
    pub url: String,
    pub addr: SocketAddr,
    connections: Arc<AtomicUsize>,
    cancel: CancellationToken,
}

impl TestServer {
    pub async fn start(handler: ServerHandler) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        Self::serve(listener, handler)
    }

    /// Start on a specific address, e.g. one a client was configured with earlier.
    pub async fn start_on(addr: SocketAddr, handler: ServerHandler) -> Self {
        let listener = TcpListener::bind(addr).await.unwrap();
        Self::serve(listener, handler)
    }

    fn serve(listener: TcpListener, handler: ServerHandler) -> Self {
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();

        let counter = connections.clone();
        let token = cancel.clone();
        tokio::spawn(async move {
            loop {
                let stream = tokio::select! {
                    _ = token.cancelled() => return,
                    accepted = listener.accept() => match accepted {
                        Ok((stream, _)) => stream,
                        Err(_) => return,
                    },
                };
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(handle_connection(stream, handler.clone(), token.clone()));
            }
        });

        TestServer {
            url: format!("ws://{addr}"),
            addr,
            connections,
            cancel,
        }
    }

    /// Number of connections accepted so far.
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Stop accepting and drop every open connection.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn handle_connection(stream: TcpStream, handler: ServerHandler, cancel: CancellationToken) {
    let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
        return;
    };
    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => return,
            frame = ws.next() => frame,
        };
        let text = match frame {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(_)) => continue,
            _ => return,
        };
        let request = ClientMessage::from_json(&text).unwrap();
        let Some(replies) = handler(request) else {
            let _ = ws.close(None).await;
            return;
        };
        for reply in replies {
            let json = reply.to_json().unwrap();
            if ws.send(Message::Text(json.into())).await.is_err() {
                return;
            }
        }
    }
}

/// A handler behaving like a well-formed event store, and the events it holds.
pub fn store_handler() -> (ServerHandler, Arc<Mutex<Vec<CareEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let store = events.clone();
    let handler: ServerHandler = Arc::new(move |request: ClientMessage| {
        let mut events = store.lock().unwrap();
        let reply = match request {
            ClientMessage::Insert { request_id, event } => {
                let stored = CareEvent::new(Uuid::new_v4(), event, at(10, 0, 5));
                events.push(stored.clone());
                ServerMessage::inserted(request_id, stored)
            }
            ClientMessage::Update {
                request_id,
                id,
                patch,
            } => match events.iter_mut().find(|e| e.id.canonical() == Some(id)) {
                Some(event) => {
                    apply_patch(&patch, event, at(12, 0, 0));
                    ServerMessage::updated(request_id, event.clone())
                }
                None => ServerMessage::rejected(request_id, RejectReason::NotFound, id.to_string()),
            },
            ClientMessage::Delete { request_id, id } => {
                let before = events.len();
                events.retain(|e| e.id.canonical() != Some(id));
                if events.len() < before {
                    ServerMessage::deleted(request_id)
                } else {
                    ServerMessage::rejected(request_id, RejectReason::NotFound, id.to_string())
                }
            }
            ClientMessage::Query { request_id, query } => {
                let matching = events.iter().filter(|e| query_matches(&query, e)).cloned().collect();
                ServerMessage::events(request_id, matching)
            }
            ClientMessage::Ping { id } => ServerMessage::pong(id),
        };
        Some(vec![reply])
    });
    (handler, events)
}

/// Reserve a local address with nothing listening on it.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
