//! HTTP and WebSocket API surface.
//!
//! Routes: `POST /rooms` (create a room), `POST /autocomplete`
//! (suggestion service), `GET /ws/:room_id` (join a room). A room's id
//! is itself the access credential; there is no further auth layer.

use crate::state::{ConnIdGenerator, RoomRegistry};
use axum::{
    Json, Router,
    extract::{Path, State, ws::WebSocketUpgrade},
    response::IntoResponse,
    routing::{get, post},
};
use pairpad_proto::rest::{AutocompleteRequest, AutocompleteResponse, RoomCreateResponse};
use std::sync::Arc;
use tracing::info;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<RoomRegistry>,
    conn_ids: Arc<ConnIdGenerator>,
}

/// Build the API router around a room registry.
pub fn router(registry: Arc<RoomRegistry>) -> Router {
    let state = AppState {
        registry,
        conn_ids: Arc::new(ConnIdGenerator::new()),
    };

    Router::new()
        .route("/rooms", post(create_room))
        .route("/autocomplete", post(autocomplete))
        .route("/ws/:room_id", get(ws_upgrade))
        .with_state(state)
}

/// Handler for POST /rooms.
async fn create_room(State(state): State<AppState>) -> Json<RoomCreateResponse> {
    let room_id = state.registry.create();
    info!(room = %room_id, "Room created via API");
    Json(RoomCreateResponse { room_id })
}

/// Handler for POST /autocomplete.
async fn autocomplete(Json(request): Json<AutocompleteRequest>) -> Json<AutocompleteResponse> {
    Json(crate::suggest::complete(&request))
}

/// Handler for GET /ws/:room_id - upgrade and hand off to the
/// connection handler. Unknown room ids are created lazily.
async fn ws_upgrade(
    Path(room_id): Path<String>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let conn_id = state.conn_ids.next();
    ws.on_upgrade(move |socket| {
        crate::network::handle_socket(socket, room_id, conn_id, state.registry)
    })
}
