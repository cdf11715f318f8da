//! WebSocket client for `sitecms-server`.
//!
//! One connection carries every subscription and write. Subscriptions are
//! multiplexed per path: the server is told about a path when its first
//! listener arrives and when its last listener leaves. Writes are matched
//! to their acknowledgement by request id.
//!
//! There is no reconnect and no write timeout. When the connection drops,
//! every listener gets a [`StoreError`] and every pending write fails.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::protocol::{ClientMessage, ServerMessage};
use super::{RemoteStore, SnapshotListener, StoreError, StorePath, Subscription};
use crate::auth::Session;

type ListenerEntry = (u64, Arc<dyn SnapshotListener>);
type PendingWrite = oneshot::Sender<Result<(), StoreError>>;

#[derive(Default)]
struct State {
    listeners: HashMap<StorePath, Vec<ListenerEntry>>,
    /// Last snapshot per subscribed path, for listeners joining late.
    latest: HashMap<StorePath, Option<Value>>,
    pending: HashMap<u64, PendingWrite>,
    next_listener: u64,
    next_request: u64,
    closed: Option<StoreError>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn dispatch(&self, text: &str) {
        let message = match ServerMessage::decode(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring undecodable server message");
                return;
            }
        };

        match message {
            ServerMessage::Snapshot { path, value } => {
                tracing::debug!(path = %path, present = value.is_some(), "Snapshot received");
                let listeners = {
                    let mut state = self.lock();
                    let listeners = listeners_for(&state, &path);
                    if !listeners.is_empty() {
                        state.latest.insert(path, value.clone());
                    }
                    listeners
                };
                for listener in listeners {
                    listener.on_snapshot(value.clone());
                }
            }
            ServerMessage::SubscriptionError { path, message } => {
                tracing::warn!(path = %path, %message, "Subscription rejected");
                let listeners = listeners_for(&self.lock(), &path);
                for listener in listeners {
                    listener.on_error(StoreError::Rejected(message.clone()));
                }
            }
            ServerMessage::WriteAck { request_id } => self.resolve(request_id, Ok(())),
            ServerMessage::WriteError {
                request_id,
                message,
            } => self.resolve(request_id, Err(StoreError::Rejected(message))),
        }
    }

    fn resolve(&self, request_id: u64, result: Result<(), StoreError>) {
        match self.lock().pending.remove(&request_id) {
            Some(reply) => {
                let _ = reply.send(result);
            }
            None => tracing::warn!(request_id, "Reply for unknown write request"),
        }
    }

    fn close(&self, reason: StoreError) {
        let (listeners, pending) = {
            let mut state = self.lock();
            state.closed = Some(reason.clone());
            state.latest.clear();
            let listeners: Vec<_> = state
                .listeners
                .drain()
                .flat_map(|(_, entries)| entries.into_iter().map(|(_, l)| l))
                .collect();
            let pending: Vec<_> = state.pending.drain().map(|(_, reply)| reply).collect();
            (listeners, pending)
        };

        tracing::info!(reason = %reason, listeners = listeners.len(), "Store connection closed");
        for listener in listeners {
            listener.on_error(reason.clone());
        }
        for reply in pending {
            let _ = reply.send(Err(reason.clone()));
        }
    }
}

fn listeners_for(state: &State, path: &StorePath) -> Vec<Arc<dyn SnapshotListener>> {
    state
        .listeners
        .get(path)
        .map(|entries| entries.iter().map(|(_, l)| l.clone()).collect())
        .unwrap_or_default()
}

/// Remote store reached over a WebSocket connection to `sitecms-server`.
pub struct WsStore {
    shared: Arc<Shared>,
    outgoing: mpsc::UnboundedSender<ClientMessage>,
}

impl WsStore {
    /// Connects to the server at `server_url` (http, https, ws or wss).
    pub async fn connect(server_url: &str) -> Result<Self, StoreError> {
        let url = ws_url(server_url);
        let (stream, _) = connect_async(&url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        tracing::info!(url = %url, "Connected to store");

        let (mut sink, mut source) = stream.split();
        let (outgoing, mut queue) = mpsc::unbounded_channel::<ClientMessage>();
        let shared = Arc::new(Shared::default());

        tokio::spawn(async move {
            while let Some(message) = queue.recv().await {
                let text = match message.encode() {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to encode client message");
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::Text(text.into())).await {
                    tracing::warn!(error = %e, "Failed to send to store");
                    break;
                }
            }
            let _ = sink.send(Message::Close(None)).await;
        });

        let reader = shared.clone();
        tokio::spawn(async move {
            let reason = loop {
                match source.next().await {
                    Some(Ok(Message::Text(text))) => reader.dispatch(text.as_str()),
                    Some(Ok(Message::Close(_))) | None => break StoreError::Disconnected,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break StoreError::Connection(e.to_string()),
                }
            };
            reader.close(reason);
        });

        Ok(Self { shared, outgoing })
    }

    /// Whether the connection is still usable.
    pub fn is_connected(&self) -> bool {
        self.shared.lock().closed.is_none()
    }
}

#[async_trait]
impl RemoteStore for WsStore {
    fn subscribe(&self, path: &StorePath, listener: Arc<dyn SnapshotListener>) -> Subscription {
        let mut state = self.shared.lock();
        let closed = state.closed.clone();
        if let Some(error) = closed {
            drop(state);
            listener.on_error(error);
            return Subscription::inert(path.clone());
        }

        let id = state.next_listener;
        state.next_listener += 1;
        let first = {
            let entries = state.listeners.entry(path.clone()).or_default();
            entries.push((id, listener.clone()));
            entries.len() == 1
        };
        let cached = if first {
            None
        } else {
            state.latest.get(path).cloned()
        };
        drop(state);

        if first {
            tracing::debug!(path = %path, "Subscribing");
            if self
                .outgoing
                .send(ClientMessage::Subscribe { path: path.clone() })
                .is_err()
            {
                listener.on_error(StoreError::Disconnected);
            }
        } else if let Some(value) = cached {
            listener.on_snapshot(value);
        }

        let shared = Arc::downgrade(&self.shared);
        let outgoing = self.outgoing.clone();
        let key = path.clone();
        Subscription::new(path.clone(), move || {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let last = {
                let mut state = shared.lock();
                let last = match state.listeners.get_mut(&key) {
                    Some(entries) => {
                        entries.retain(|(entry_id, _)| *entry_id != id);
                        entries.is_empty()
                    }
                    None => false,
                };
                if last {
                    state.listeners.remove(&key);
                    state.latest.remove(&key);
                }
                last
            };
            if last {
                let _ = outgoing.send(ClientMessage::Unsubscribe { path: key });
            }
        })
    }

    async fn write(
        &self,
        path: &StorePath,
        value: Value,
        session: &Session,
    ) -> Result<(), StoreError> {
        let (request_id, reply) = {
            let mut state = self.shared.lock();
            if let Some(error) = &state.closed {
                return Err(error.clone());
            }
            let request_id = state.next_request;
            state.next_request += 1;
            let (tx, rx) = oneshot::channel();
            state.pending.insert(request_id, tx);
            (request_id, rx)
        };

        let message = ClientMessage::Write {
            request_id,
            path: path.clone(),
            value,
            token: session.token.clone(),
        };
        if self.outgoing.send(message).is_err() {
            self.shared.lock().pending.remove(&request_id);
            return Err(StoreError::Disconnected);
        }

        tracing::debug!(path = %path, request_id, "Write sent");
        reply.await.unwrap_or(Err(StoreError::Disconnected))
    }
}

/// Builds the WebSocket endpoint URL from a server URL.
pub fn ws_url(server_url: &str) -> String {
    let base = if let Some(rest) = server_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else if let Some(rest) = server_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if !server_url.starts_with("ws://") && !server_url.starts_with("wss://") {
        format!("ws://{}", server_url)
    } else {
        server_url.to_string()
    };
    format!("{}/ws", base.trim_end_matches('/'))
}

/// Builds an HTTP URL for `path` on the server.
pub fn http_url(server_url: &str, path: &str) -> String {
    let base = if let Some(rest) = server_url.strip_prefix("ws://") {
        format!("http://{}", rest)
    } else if let Some(rest) = server_url.strip_prefix("wss://") {
        format!("https://{}", rest)
    } else if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
        format!("http://{}", server_url)
    } else {
        server_url.to_string()
    };
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CallbackListener;
    use serde_json::json;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    #[test]
    fn test_ws_url() {
        assert_eq!(ws_url("http://localhost:8080"), "ws://localhost:8080/ws");
        assert_eq!(ws_url("https://cms.example.com/"), "wss://cms.example.com/ws");
        assert_eq!(ws_url("localhost:8080"), "ws://localhost:8080/ws");
        assert_eq!(ws_url("ws://localhost:8080"), "ws://localhost:8080/ws");
    }

    #[test]
    fn test_http_url() {
        assert_eq!(
            http_url("ws://localhost:8080", "/health"),
            "http://localhost:8080/health"
        );
        assert_eq!(
            http_url("wss://cms.example.com", "/health"),
            "https://cms.example.com/health"
        );
        assert_eq!(
            http_url("http://localhost:8080/", "/health"),
            "http://localhost:8080/health"
        );
    }

    /// Serves one connection: answers the first subscribe with `snapshot`,
    /// acks every write, then closes after `writes` writes.
    async fn scripted_server(snapshot: Value, writes: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let mut seen_writes = 0;
            while let Some(Ok(Message::Text(text))) = ws.next().await {
                let reply = match ClientMessage::decode(text.as_str()).unwrap() {
                    ClientMessage::Subscribe { path } => ServerMessage::Snapshot {
                        path,
                        value: Some(snapshot.clone()),
                    },
                    ClientMessage::Unsubscribe { .. } => continue,
                    ClientMessage::Write {
                        request_id, token, ..
                    } => {
                        seen_writes += 1;
                        if token == "good" {
                            ServerMessage::WriteAck { request_id }
                        } else {
                            ServerMessage::WriteError {
                                request_id,
                                message: "invalid token".to_string(),
                            }
                        }
                    }
                };
                ws.send(Message::Text(reply.encode().unwrap().into()))
                    .await
                    .unwrap();
                if seen_writes == writes {
                    let _ = ws.close(None).await;
                    break;
                }
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_subscribe_and_write_round_trip() {
        let url = scripted_server(json!({"siteName": "Remote"}), 2).await;
        let store = WsStore::connect(&url).await.unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let errors = tx.clone();
        let listener = CallbackListener::new(
            move |value| {
                let _ = tx.send(Ok(value));
            },
            move |error| {
                let _ = errors.send(Err(error));
            },
        );
        let path = StorePath::parse("site/content").unwrap();
        let _sub = store.subscribe(&path, listener);

        let first = rx.recv().await.unwrap();
        assert_eq!(first, Ok(Some(json!({"siteName": "Remote"}))));

        let ok = store
            .write(&path, json!({}), &Session::new("alice", "good"))
            .await;
        assert_eq!(ok, Ok(()));

        let rejected = store
            .write(&path, json!({}), &Session::new("mallory", "bad"))
            .await;
        assert_eq!(
            rejected,
            Err(StoreError::Rejected("invalid token".to_string()))
        );

        // The server hangs up after the second write.
        let closed = rx.recv().await.unwrap();
        assert_eq!(closed, Err(StoreError::Disconnected));
        assert!(!store.is_connected());

        let after = store
            .write(&path, json!({}), &Session::new("alice", "good"))
            .await;
        assert_eq!(after, Err(StoreError::Disconnected));
    }

    #[tokio::test]
    async fn test_connect_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = WsStore::connect(&format!("http://{}", addr)).await;
        assert!(matches!(result, Err(StoreError::Connection(_))));
    }
}
