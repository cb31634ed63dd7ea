//! WebSocket Handler
//!
//! This module provides the WebSocket handler that streams pointer and
//! toolbar events into a canvas session and fans the resulting updates out
//! to every connection attached to that session.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::protocol::{ClientMessage, ServerMessage, UpdateSource};
use crate::session::CanvasSessionManager;

type WsSender = Arc<Mutex<SplitSink<WebSocket, Message>>>;

/// Shared state for the WebSocket handler
pub struct CanvasState {
    /// Session manager
    pub session_manager: Arc<CanvasSessionManager>,
    /// Broadcast channel for session updates
    pub broadcast_tx: broadcast::Sender<BroadcastMessage>,
}

impl CanvasState {
    /// Create a new canvas state
    #[must_use]
    pub fn new(session_manager: Arc<CanvasSessionManager>) -> Self {
        let (broadcast_tx, _) = broadcast::channel(1024);
        Self {
            session_manager,
            broadcast_tx,
        }
    }
}

/// Message broadcast to all connections in a session
#[derive(Debug, Clone)]
pub struct BroadcastMessage {
    /// Session ID
    pub session_id: Uuid,
    /// Connection ID that originated the message (to exclude from broadcast)
    pub origin_connection_id: Option<Uuid>,
    /// Server message to broadcast
    pub message: ServerMessage,
}

/// WebSocket upgrade handler
pub async fn canvas_ws_handler(
    ws: WebSocketUpgrade,
    Path(session_id): Path<Uuid>,
    State(state): State<Arc<CanvasState>>,
) -> impl IntoResponse {
    info!(session_id = %session_id, "WebSocket upgrade requested");
    ws.on_upgrade(move |socket| handle_socket(socket, session_id, state))
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, session_id: Uuid, state: Arc<CanvasState>) {
    let connection_id = Uuid::new_v4();
    info!(
        session_id = %session_id,
        connection_id = %connection_id,
        "WebSocket connected"
    );

    let (mut sender, mut receiver) = socket.split();

    // Subscribe before the welcome so no update slips between the two
    let mut broadcast_rx = state.broadcast_tx.subscribe();

    let welcome_msg = match state.session_manager.get_session(session_id).await {
        Some(info) => ServerMessage::welcome(session_id, info.state),
        None => {
            let _ = send_message(
                &mut sender,
                &ServerMessage::error("session_not_found", "Session not found"),
            )
            .await;
            return;
        }
    };

    if let Err(e) = send_message(&mut sender, &welcome_msg).await {
        error!(error = %e, "Failed to send welcome message");
        return;
    }

    // Spawn broadcast receiver task
    let sender: WsSender = Arc::new(Mutex::new(sender));
    let sender_for_broadcast = sender.clone();
    let manager = state.session_manager.clone();
    let broadcast_handle = tokio::spawn(async move {
        while let Some(msg) =
            next_for_connection(&mut broadcast_rx, session_id, connection_id, &manager).await
        {
            let mut sender = sender_for_broadcast.lock().await;
            if send_message(&mut sender, &msg).await.is_err() {
                break;
            }
        }
    });

    // Main message loop
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Err(e) =
                    handle_client_message(&text, session_id, connection_id, &state, &sender).await
                {
                    warn!(error = %e, "Error handling message");
                    let mut sender = sender.lock().await;
                    let _ =
                        send_message(&mut sender, &ServerMessage::error(e.code(), e.to_string()))
                            .await;
                }
            }
            Ok(Message::Close(_)) => {
                info!(connection_id = %connection_id, "WebSocket closed by client");
                break;
            }
            Ok(Message::Ping(data)) => {
                let mut sender = sender.lock().await;
                let _ = sender.send(Message::Pong(data)).await;
            }
            Err(e) => {
                warn!(error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    broadcast_handle.abort();
    info!(connection_id = %connection_id, "WebSocket disconnected");
}

/// Next message to forward to one connection
///
/// Skips other sessions and the connection's own updates. A receiver that
/// lagged behind the channel gets a fresh state snapshot in place of the
/// dropped updates. Returns `None` once the channel closes or the session is
/// gone.
async fn next_for_connection(
    broadcast_rx: &mut broadcast::Receiver<BroadcastMessage>,
    session_id: Uuid,
    connection_id: Uuid,
    session_manager: &CanvasSessionManager,
) -> Option<ServerMessage> {
    loop {
        match broadcast_rx.recv().await {
            Ok(msg) => {
                if msg.session_id == session_id && msg.origin_connection_id != Some(connection_id)
                {
                    return Some(msg.message);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(
                    session_id = %session_id,
                    connection_id = %connection_id,
                    skipped,
                    "Viewer lagged behind, resyncing state"
                );
                let info = session_manager.get_session(session_id).await?;
                return Some(ServerMessage::State { state: info.state });
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

/// Send a server message
async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<()> {
    let json = serde_json::to_string(message)?;
    sender.send(Message::Text(json)).await?;
    Ok(())
}

/// Handle a client message
async fn handle_client_message(
    text: &str,
    session_id: Uuid,
    connection_id: Uuid,
    state: &Arc<CanvasState>,
    sender: &WsSender,
) -> Result<()> {
    let client_msg: ClientMessage = serde_json::from_str(text)
        .map_err(|e| Error::invalid_message(format!("Invalid message: {e}")))?;

    match client_msg {
        ClientMessage::Ping => {
            let mut sender = sender.lock().await;
            send_message(&mut sender, &ServerMessage::Pong).await?;
        }

        ClientMessage::Sync => {
            let info = state
                .session_manager
                .get_session(session_id)
                .await
                .ok_or(Error::SessionNotFound(session_id))?;
            let mut sender = sender.lock().await;
            send_message(&mut sender, &ServerMessage::State { state: info.state }).await?;
        }

        ClientMessage::Command { command } => {
            let pointer = command.is_pointer_event();
            let update = state.session_manager.apply(session_id, command).await?;
            if !pointer {
                debug!(session_id = %session_id, "Canvas command applied over WebSocket");
            }

            {
                let mut sender = sender.lock().await;
                send_message(
                    &mut sender,
                    &ServerMessage::update(update.clone(), UpdateSource::User),
                )
                .await?;
            }

            // Broadcast the update to other connections
            let _ = state.broadcast_tx.send(BroadcastMessage {
                session_id,
                origin_connection_id: Some(connection_id),
                message: ServerMessage::update(update, UpdateSource::OtherUser),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::CanvasUpdate;

    #[test]
    fn test_canvas_state_creation() {
        let manager = Arc::new(CanvasSessionManager::default());
        let state = CanvasState::new(manager);
        assert_eq!(state.broadcast_tx.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_subscribers() {
        let state = CanvasState::new(Arc::new(CanvasSessionManager::default()));
        let mut rx = state.broadcast_tx.subscribe();

        let session_id = Uuid::new_v4();
        state
            .broadcast_tx
            .send(BroadcastMessage {
                session_id,
                origin_connection_id: None,
                message: ServerMessage::update(
                    CanvasUpdate::LayerAdded { index: 1 },
                    UpdateSource::OtherUser,
                ),
            })
            .unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.session_id, session_id);
        assert!(received.origin_connection_id.is_none());
    }

    fn update_for(session_id: Uuid, origin: Option<Uuid>) -> BroadcastMessage {
        BroadcastMessage {
            session_id,
            origin_connection_id: origin,
            message: ServerMessage::update(
                CanvasUpdate::LayerAdded { index: 1 },
                UpdateSource::OtherUser,
            ),
        }
    }

    #[tokio::test]
    async fn test_forwarding_skips_other_sessions_and_own_updates() {
        let manager = CanvasSessionManager::default();
        let state = CanvasState::new(Arc::new(CanvasSessionManager::default()));
        let mut rx = state.broadcast_tx.subscribe();
        let session_id = Uuid::new_v4();
        let connection_id = Uuid::new_v4();

        state.broadcast_tx.send(update_for(Uuid::new_v4(), None)).unwrap();
        state
            .broadcast_tx
            .send(update_for(session_id, Some(connection_id)))
            .unwrap();
        state.broadcast_tx.send(update_for(session_id, None)).unwrap();

        let msg = next_for_connection(&mut rx, session_id, connection_id, &manager).await;
        assert!(matches!(
            msg,
            Some(ServerMessage::Update {
                source: UpdateSource::OtherUser,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_lagged_viewer_resyncs_and_keeps_forwarding() {
        let manager = CanvasSessionManager::default();
        let info = manager.create_session("viewer", Some((8, 8))).await.unwrap();
        let state = CanvasState::new(Arc::new(CanvasSessionManager::default()));
        let mut rx = state.broadcast_tx.subscribe();
        let connection_id = Uuid::new_v4();

        let busy_session = Uuid::new_v4();
        for _ in 0..1100 {
            state.broadcast_tx.send(update_for(busy_session, None)).unwrap();
        }
        state.broadcast_tx.send(update_for(info.id, None)).unwrap();

        let msg = next_for_connection(&mut rx, info.id, connection_id, &manager).await;
        assert!(matches!(msg, Some(ServerMessage::State { .. })));

        let msg = next_for_connection(&mut rx, info.id, connection_id, &manager).await;
        assert!(matches!(msg, Some(ServerMessage::Update { .. })));
    }

    #[tokio::test]
    async fn test_forwarding_ends_when_channel_closes() {
        let manager = CanvasSessionManager::default();
        let (tx, mut rx) = broadcast::channel::<BroadcastMessage>(4);
        drop(tx);

        let msg = next_for_connection(&mut rx, Uuid::new_v4(), Uuid::new_v4(), &manager).await;
        assert!(msg.is_none());
    }
}
