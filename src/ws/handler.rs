//! Axum WebSocket upgrade handler.
//!
//! Only `GET /ws` reaches this handler; requests for any other path never
//! touch the live subsystem. Oversized inbound frames are rejected by the
//! transport before they reach the dispatcher.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use super::messages::MAX_FRAME_BYTES;
use crate::app_state::AppState;

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let hub = Arc::clone(&state.live_hub);

    ws.max_message_size(MAX_FRAME_BYTES)
        .on_upgrade(move |socket| run_connection(socket, hub))
}
