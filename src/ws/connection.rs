//! Per-connection read/write loop.
//!
//! Each admitted WebSocket gets one task that forwards outbound frames
//! from the hub and feeds inbound frames to the dispatcher in arrival
//! order. Any exit path funnels through [`LiveHub::terminate`], so a
//! transport error cleans up subscriptions exactly like an explicit close.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::hub::LiveHub;

/// Runs the read/write loop for a single WebSocket connection.
pub async fn run_connection(socket: WebSocket, hub: Arc<LiveHub>) {
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let conn = hub.admit(out_tx).await;
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Outbound frame from the hub
            frame = out_rx.recv() => {
                match frame {
                    Some(frame) => {
                        if ws_tx.send(frame).await.is_err() {
                            break;
                        }
                    }
                    // Hub dropped the sender: we were terminated
                    None => {
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
            // Inbound frame from the client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        hub.handle_frame(conn, text.as_str()).await;
                    }
                    Some(Ok(Message::Pong(_))) => {
                        hub.mark_alive(conn).await;
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Binary frames and client pings (answered by the
                    // transport) carry no control semantics
                    _ => {}
                }
            }
        }
    }

    hub.terminate(conn).await;
    tracing::debug!(conn, "ws connection closed");
}
