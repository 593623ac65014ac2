//! WebSocket upgrade handler.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use orderhub_realtime::{ConnectionHandle, Frame, RealtimeEngine};

/// Upper bound on flushing the close frame to a peer that stopped reading.
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

use crate::state::AppState;

/// GET /ws: WebSocket upgrade
///
/// Identity is established by the first message, not at upgrade time.
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let engine = state.realtime.clone();
    ws.on_upgrade(move |socket| handle_ws_connection(engine, socket))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(engine: Arc<RealtimeEngine>, socket: WebSocket) {
    let (ws_tx, mut ws_rx) = socket.split();
    let (handle, outbound_rx) = engine.open_connection();
    let conn_id = handle.id;

    info!(conn_id = %conn_id, "WebSocket connection established");

    let mut outbound_task = tokio::spawn(forward_frames(handle.clone(), outbound_rx, ws_tx));

    // Process inbound messages until the peer leaves or the writer stops
    loop {
        tokio::select! {
            next = ws_rx.next() => match next {
                Some(Ok(Message::Text(text))) => engine.handle_text(&handle, text.as_str()),
                Some(Ok(Message::Pong(_))) => engine.handle_pong(&handle),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            },
            _ = &mut outbound_task => break,
        }
    }

    // Cleanup
    outbound_task.abort();
    engine.close_connection(&handle);

    info!(
        conn_id = %conn_id,
        user_id = ?handle.user_id(),
        "WebSocket connection closed"
    );
}

/// Drain queued frames into the socket until the connection is closed.
///
/// Stops as soon as the handle is closed or marked dead, even when the
/// queue is full and no `Close` frame could be queued.
async fn forward_frames<S>(
    handle: Arc<ConnectionHandle>,
    mut outbound_rx: mpsc::Receiver<Frame>,
    mut sink: S,
) where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let conn_id = handle.id;

    loop {
        let frame = tokio::select! {
            biased;
            _ = handle.closed() => break,
            frame = outbound_rx.recv() => match frame {
                Some(frame) => frame,
                None => return,
            },
        };
        let msg = match frame {
            Frame::Text(text) => Message::Text(text.into()),
            Frame::Ping => Message::Ping(Bytes::new()),
            Frame::Close => break,
        };
        if let Err(e) = sink.send(msg).await {
            debug!(conn_id = %conn_id, error = %e, "Outbound send failed");
            return;
        }
    }

    match tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, sink.send(Message::Close(None))).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!(conn_id = %conn_id, error = %e, "Close frame not sent"),
        Err(_) => debug!(conn_id = %conn_id, "Timed out sending close frame"),
    }
}
