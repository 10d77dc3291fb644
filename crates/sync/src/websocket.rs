// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket client for the remote event store.
//!
//! One connection is opened lazily and reused. Requests are serialized over
//! it: each request is sent, then frames are read until the response carrying
//! the same request id arrives. Any transport failure or timeout drops the
//! connection so the next request reconnects.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;
use uuid::Uuid;

use carelog_core::protocol::{ClientMessage, RejectReason, ServerMessage};
use carelog_core::{CareEvent, CareEventInsert, CareEventPatch, EventQuery};

use crate::config::RemoteConfig;
use crate::repository::{BoxFuture, EventRepository, RepositoryError, RepositoryResult};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// [`EventRepository`] backed by a WebSocket connection.
pub struct WebSocketRepository {
    config: RemoteConfig,
    /// The connection, if connected.
    ws: Mutex<Option<WsStream>>,
    next_id: AtomicU64,
}

impl WebSocketRepository {
    /// Create a repository; no connection is made until the first request.
    pub fn new(config: RemoteConfig) -> Self {
        WebSocketRepository {
            config,
            ws: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    fn next_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn connect(&self) -> RepositoryResult<WsStream> {
        let url = self.config.url.as_str();
        match tokio::time::timeout(
            self.config.connect_timeout(),
            tokio_tungstenite::connect_async(url),
        )
        .await
        {
            Ok(Ok((stream, _))) => {
                debug!(url, "connected to event store");
                Ok(stream)
            }
            Ok(Err(e)) => Err(RepositoryError::Network(format!(
                "connection to {url} failed: {e}"
            ))),
            Err(_) => Err(RepositoryError::Timeout),
        }
    }

    /// Send one request and wait for its response.
    async fn round_trip(&self, msg: ClientMessage) -> RepositoryResult<ServerMessage> {
        let mut guard = self.ws.lock().await;

        if guard.is_none() {
            *guard = Some(self.connect().await?);
        }
        let Some(ws) = guard.as_mut() else {
            return Err(RepositoryError::Network("not connected".to_string()));
        };

        let outcome =
            tokio::time::timeout(self.config.request_timeout(), exchange(ws, &msg)).await;

        match outcome {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => {
                *guard = None;
                Err(e)
            }
            Err(_) => {
                // The late response may still arrive; a fresh connection avoids
                // reading it as the answer to the next request.
                *guard = None;
                Err(RepositoryError::Timeout)
            }
        }
    }
}

/// Write `msg` and read frames until its response arrives.
async fn exchange(ws: &mut WsStream, msg: &ClientMessage) -> RepositoryResult<ServerMessage> {
    let json = msg
        .to_json()
        .map_err(|e| RepositoryError::Protocol(e.to_string()))?;

    ws.send(Message::Text(json.into()))
        .await
        .map_err(|e| RepositoryError::Network(format!("send failed: {e}")))?;

    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => {
                let reply = ServerMessage::from_json(&text)
                    .map_err(|e| RepositoryError::Protocol(e.to_string()))?;
                if answers(msg, &reply) {
                    return Ok(reply);
                }
                if let ServerMessage::Error { message } = reply {
                    return Err(RepositoryError::Protocol(message));
                }
                debug!("skipping unrelated frame: {:?}", reply);
            }
            Some(Ok(Message::Close(_))) | None => {
                return Err(RepositoryError::Network("connection closed".to_string()));
            }
            Some(Ok(_)) => {
                // Ignore ping/pong and binary frames
                continue;
            }
            Some(Err(e)) => {
                return Err(RepositoryError::Network(format!("receive failed: {e}")));
            }
        }
    }
}

fn answers(request: &ClientMessage, reply: &ServerMessage) -> bool {
    match (request, reply) {
        (ClientMessage::Ping { id }, ServerMessage::Pong { id: echoed }) => id == echoed,
        _ => request.request_id().is_some() && request.request_id() == reply.request_id(),
    }
}

fn rejection(reason: RejectReason, message: String) -> RepositoryError {
    match reason {
        RejectReason::Validation => RepositoryError::Validation(message),
        RejectReason::Auth => RepositoryError::Auth(message),
        RejectReason::NotFound => RepositoryError::NotFound(message),
    }
}

fn unexpected(reply: ServerMessage) -> RepositoryError {
    match reply {
        ServerMessage::Rejected {
            reason, message, ..
        } => rejection(reason, message),
        other => RepositoryError::Protocol(format!("unexpected response: {other:?}")),
    }
}

impl EventRepository for WebSocketRepository {
    fn insert(&self, event: CareEventInsert) -> BoxFuture<'_, RepositoryResult<CareEvent>> {
        Box::pin(async move {
            let msg = ClientMessage::insert(self.next_request_id(), event);
            match self.round_trip(msg).await? {
                ServerMessage::Inserted { event, .. } => Ok(event),
                other => Err(unexpected(other)),
            }
        })
    }

    fn update(
        &self,
        id: Uuid,
        patch: CareEventPatch,
    ) -> BoxFuture<'_, RepositoryResult<CareEvent>> {
        Box::pin(async move {
            let msg = ClientMessage::update(self.next_request_id(), id, patch);
            match self.round_trip(msg).await? {
                ServerMessage::Updated { event, .. } => Ok(event),
                other => Err(unexpected(other)),
            }
        })
    }

    fn delete(&self, id: Uuid) -> BoxFuture<'_, RepositoryResult<()>> {
        Box::pin(async move {
            let msg = ClientMessage::delete(self.next_request_id(), id);
            match self.round_trip(msg).await? {
                ServerMessage::Deleted { .. } => Ok(()),
                other => Err(unexpected(other)),
            }
        })
    }

    fn query(&self, query: EventQuery) -> BoxFuture<'_, RepositoryResult<Vec<CareEvent>>> {
        Box::pin(async move {
            let msg = ClientMessage::query(self.next_request_id(), query);
            match self.round_trip(msg).await? {
                ServerMessage::Events { events, .. } => Ok(events),
                other => Err(unexpected(other)),
            }
        })
    }

    fn ping(&self) -> BoxFuture<'_, RepositoryResult<()>> {
        Box::pin(async move {
            let msg = ClientMessage::ping(self.next_request_id());
            match self.round_trip(msg).await? {
                ServerMessage::Pong { .. } => Ok(()),
                other => Err(unexpected(other)),
            }
        })
    }
}
