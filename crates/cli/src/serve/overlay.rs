//! WebSocket fan-out of overlay payloads.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use super::state::AppState;

/// GET /ws
pub(crate) async fn handle_overlay_socket(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(hub) = state.ingestor.overlay() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    // Subscribe before upgrading so nothing published after the 101 is missed.
    let rx = hub.subscribe();
    ws.on_upgrade(move |socket| forward(socket, rx))
}

async fn forward(mut socket: WebSocket, mut rx: broadcast::Receiver<String>) {
    info!("overlay client connected");
    loop {
        tokio::select! {
            published = rx.recv() => match published {
                Ok(payload) => {
                    if socket.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "overlay client fell behind, dropped payloads");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(other)) => debug!(?other, "ignoring overlay client message"),
            },
        }
    }
    info!("overlay client disconnected");
}
