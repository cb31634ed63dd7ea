//! Canvas API endpoints
//!
//! POST   /api/v1/canvas/sessions                - Create a compositor session
//! GET    /api/v1/canvas/sessions/:id            - Get session state
//! DELETE /api/v1/canvas/sessions/:id            - Close a session
//! POST   /api/v1/canvas/sessions/:id/commands   - Apply a canvas command
//! GET    /api/v1/canvas/sessions/:id/export     - Export the composite image
//! POST   /api/v1/canvas/sessions/:id/paintings  - Save the composite as a painting
//! GET    /api/v1/canvas/ws/:id                  - Stream commands over WebSocket
//! GET    /api/v1/users/:user_id/paintings       - List a user's paintings
//! GET    /api/v1/paintings/:id                  - Get a painting

use atelier_canvas::{
    canvas_ws_handler, BroadcastMessage, CanvasCommand, CanvasState, CanvasUpdate, ExportedImage,
    Painting, PaintingStore, ServerMessage, SessionInfo, UpdateSource,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::response::{canvas_error, created, ok, ApiReply};

/// Shared state for canvas endpoints
#[derive(Clone)]
pub struct CanvasApiState {
    pub canvas: Arc<CanvasState>,
    pub paintings: PaintingStore,
}

/// Request to create a canvas session
#[derive(Debug, Deserialize)]
pub struct CreateCanvasRequest {
    /// Owner of the session
    pub user_id: String,
    /// Canvas width (defaults from config)
    #[serde(default)]
    pub width: Option<u32>,
    /// Canvas height (defaults from config)
    #[serde(default)]
    pub height: Option<u32>,
}

/// Create a new compositor session
async fn create_session(
    State(state): State<CanvasApiState>,
    Json(request): Json<CreateCanvasRequest>,
) -> ApiReply<SessionInfo> {
    if request.user_id.trim().is_empty() {
        return canvas_error(atelier_canvas::Error::invalid_argument(
            "user_id must not be empty",
        ));
    }

    let manager = &state.canvas.session_manager;
    let size = match (request.width, request.height) {
        (None, None) => None,
        (width, height) => {
            let defaults = manager.default_settings();
            Some((
                width.unwrap_or(defaults.width),
                height.unwrap_or(defaults.height),
            ))
        }
    };

    match manager.create_session(request.user_id, size).await {
        Ok(info) => {
            info!(session_id = %info.id, user_id = %info.user_id, "Canvas session created");
            created(info)
        }
        Err(e) => canvas_error(e),
    }
}

/// Get session state
async fn get_session(
    State(state): State<CanvasApiState>,
    Path(id): Path<Uuid>,
) -> ApiReply<SessionInfo> {
    match state.canvas.session_manager.get_session(id).await {
        Some(info) => ok(info),
        None => canvas_error(atelier_canvas::Error::SessionNotFound(id)),
    }
}

/// Close a session
async fn delete_session(
    State(state): State<CanvasApiState>,
    Path(id): Path<Uuid>,
) -> ApiReply<SessionInfo> {
    match state.canvas.session_manager.remove_session(id).await {
        Some(info) => {
            info!(session_id = %id, "Canvas session closed");
            ok(info)
        }
        None => canvas_error(atelier_canvas::Error::SessionNotFound(id)),
    }
}

/// Apply a command and fan the update out to WebSocket viewers
async fn apply_command(
    State(state): State<CanvasApiState>,
    Path(id): Path<Uuid>,
    Json(command): Json<CanvasCommand>,
) -> ApiReply<CanvasUpdate> {
    let pointer = command.is_pointer_event();
    match state.canvas.session_manager.apply(id, command).await {
        Ok(update) => {
            if !pointer {
                debug!(session_id = %id, "Canvas command applied over HTTP");
            }
            let _ = state.canvas.broadcast_tx.send(BroadcastMessage {
                session_id: id,
                origin_connection_id: None,
                message: ServerMessage::update(update.clone(), UpdateSource::OtherUser),
            });
            ok(update)
        }
        Err(e) => canvas_error(e),
    }
}

/// Export the current composite image
async fn export_session(
    State(state): State<CanvasApiState>,
    Path(id): Path<Uuid>,
) -> ApiReply<ExportedImage> {
    match state.canvas.session_manager.export(id).await {
        Ok(image) => ok(ExportedImage::from(&image)),
        Err(e) => canvas_error(e),
    }
}

/// Save the current composite image as a painting owned by the session user
async fn save_painting(
    State(state): State<CanvasApiState>,
    Path(id): Path<Uuid>,
) -> ApiReply<Painting> {
    let Some(info) = state.canvas.session_manager.get_session(id).await else {
        return canvas_error(atelier_canvas::Error::SessionNotFound(id));
    };

    let image = match state.canvas.session_manager.export(id).await {
        Ok(image) => image,
        Err(e) => return canvas_error(e),
    };

    match state
        .paintings
        .save_painting(&info.user_id, &image.to_data_url())
        .await
    {
        Ok(painting) => created(painting),
        Err(e) => canvas_error(e),
    }
}

/// List a user's paintings
async fn list_paintings(
    State(state): State<CanvasApiState>,
    Path(user_id): Path<String>,
) -> ApiReply<Vec<Painting>> {
    match state.paintings.list_paintings(&user_id).await {
        Ok(paintings) => ok(paintings),
        Err(e) => canvas_error(e),
    }
}

/// Get a single painting
async fn get_painting(
    State(state): State<CanvasApiState>,
    Path(id): Path<String>,
) -> ApiReply<Painting> {
    match state.paintings.get_painting(&id).await {
        Ok(painting) => ok(painting),
        Err(e) => canvas_error(e),
    }
}

/// Create canvas routes
pub fn canvas_routes(state: CanvasApiState) -> Router {
    let websocket = Router::new()
        .route("/api/v1/canvas/ws/:id", get(canvas_ws_handler))
        .with_state(state.canvas.clone());

    Router::new()
        .route("/api/v1/canvas/sessions", post(create_session))
        .route(
            "/api/v1/canvas/sessions/:id",
            get(get_session).delete(delete_session),
        )
        .route("/api/v1/canvas/sessions/:id/commands", post(apply_command))
        .route("/api/v1/canvas/sessions/:id/export", get(export_session))
        .route("/api/v1/canvas/sessions/:id/paintings", post(save_painting))
        .route("/api/v1/users/:user_id/paintings", get(list_paintings))
        .route("/api/v1/paintings/:id", get(get_painting))
        .with_state(state)
        .merge(websocket)
}
