//! WebSocket handler speaking the store protocol.
//!
//! Each connection gets one writer task draining an outgoing queue, plus one
//! forwarding task per subscribed path relaying hub updates into that queue.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use sitecms_core::store::protocol::{ClientMessage, ServerMessage};
use sitecms_core::StorePath;
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use super::hub::Update;
use super::AppState;

type Outgoing = mpsc::UnboundedSender<ServerMessage>;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| {
        let span = tracing::info_span!("connection", id = %Uuid::new_v4());
        handle_socket(socket, state).instrument(span)
    })
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    tracing::debug!("Client connected");

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let writer = tokio::spawn(
        async move {
            while let Some(message) = rx.recv().await {
                let text = match message.encode() {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to encode message");
                        continue;
                    }
                };
                if sink.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
        .in_current_span(),
    );

    let mut watchers: HashMap<StorePath, JoinHandle<()>> = HashMap::new();

    while let Some(frame) = stream.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!(error = %e, "WebSocket receive failed");
                break;
            }
        };
        match frame {
            Message::Text(text) => match ClientMessage::decode(text.as_str()) {
                Ok(message) => handle_message(&state, message, &tx, &mut watchers).await,
                Err(e) => tracing::warn!(error = %e, "Ignoring malformed message"),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    for (path, watcher) in watchers {
        stop_watching(&state, &path, watcher).await;
    }
    drop(tx);
    let _ = writer.await;

    tracing::debug!("Client disconnected");
}

/// Cancels a forwarding task and lets the hub drop the path's channel if
/// this was its last receiver.
async fn stop_watching(state: &AppState, path: &StorePath, task: JoinHandle<()>) {
    task.abort();
    // The receiver is dropped once the cancelled task has been joined.
    let _ = task.await;
    state.hub.release(path).await;
}

async fn handle_message(
    state: &AppState,
    message: ClientMessage,
    tx: &Outgoing,
    watchers: &mut HashMap<StorePath, JoinHandle<()>>,
) {
    match message {
        ClientMessage::Subscribe { path } => {
            // Join the hub before reading so no write slips between the two.
            let receiver = state.hub.subscribe(&path).await;
            match state.load(&path).await {
                Ok(value) => {
                    let _ = tx.send(ServerMessage::Snapshot {
                        path: path.clone(),
                        value,
                    });
                }
                Err(e) => {
                    tracing::error!(path = %path, error = %e, "Failed to load value");
                    drop(receiver);
                    if !watchers.contains_key(&path) {
                        state.hub.release(&path).await;
                    }
                    let _ = tx.send(ServerMessage::SubscriptionError {
                        path,
                        message: e.to_string(),
                    });
                    return;
                }
            }

            if watchers.contains_key(&path) {
                return;
            }
            tracing::debug!(path = %path, "Subscribed");
            let task = tokio::spawn(
                forward_updates(state.clone(), path.clone(), receiver, tx.clone())
                    .in_current_span(),
            );
            watchers.insert(path, task);
        }
        ClientMessage::Unsubscribe { path } => {
            if let Some(task) = watchers.remove(&path) {
                stop_watching(state, &path, task).await;
                tracing::debug!(path = %path, "Unsubscribed");
            }
        }
        ClientMessage::Write {
            request_id,
            path,
            value,
            token,
        } => {
            let reply = match state.api_keys.validate(&token) {
                None => {
                    tracing::warn!(path = %path, "Write rejected: invalid API key");
                    ServerMessage::WriteError {
                        request_id,
                        message: "permission denied".to_string(),
                    }
                }
                Some(principal) => match state.write(&path, value).await {
                    Ok(()) => {
                        tracing::info!(path = %path, principal, "Value written");
                        ServerMessage::WriteAck { request_id }
                    }
                    Err(e) => {
                        tracing::error!(path = %path, error = %e, "Failed to save value");
                        ServerMessage::WriteError {
                            request_id,
                            message: e.to_string(),
                        }
                    }
                },
            };
            let _ = tx.send(reply);
        }
    }
}

async fn forward_updates(
    state: AppState,
    path: StorePath,
    mut receiver: broadcast::Receiver<Update>,
    tx: Outgoing,
) {
    loop {
        let message = match receiver.recv().await {
            Ok(Update { path, value }) => ServerMessage::Snapshot { path, value },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(path = %path, skipped, "Subscriber lagged, reloading");
                match state.load(&path).await {
                    Ok(value) => ServerMessage::Snapshot {
                        path: path.clone(),
                        value,
                    },
                    Err(e) => {
                        let _ = tx.send(ServerMessage::SubscriptionError {
                            path: path.clone(),
                            message: e.to_string(),
                        });
                        break;
                    }
                }
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };
        if tx.send(message).is_err() {
            break;
        }
    }
}
