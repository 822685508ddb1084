use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::manager::{Channel, WsFanout};

/// Upper bound on a single socket write. A connection that cannot
/// accept a frame within this window is treated as dead.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// The only inbound control message clients may send.
const PING_FRAME: &str = "ping";

/// HTTP handler that upgrades `/ws/events` connections.
///
/// Subscribers on this channel receive one frame per created alert.
pub async fn events_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.fanout, Channel::Events))
}

/// HTTP handler that upgrades `/ws/telemetry` connections.
///
/// Subscribers on this channel receive every persisted reading.
pub async fn telemetry_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.fanout, Channel::Telemetry))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the subscriber with `WsFanout` (Connecting).
///   2. Spawns a sender task that forwards queued messages to the sink,
///      bounding each write with [`SEND_TIMEOUT`].
///   3. Marks the subscriber Connected.
///   4. Processes inbound messages on the current task (only the
///      textual `ping` keepalive is meaningful; it gets an immediate
///      pong with no state transition).
///   5. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, fanout: Arc<WsFanout>, channel: Channel) {
    let conn_id = uuid::Uuid::new_v4().to_string();

    // Register and get the receiver for outbound messages.
    let mut rx = fanout.connect(conn_id.clone(), channel).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward queued messages to the WebSocket sink. The
    // per-send timeout keeps one stalled socket from pinning resources.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match tokio::time::timeout(SEND_TIMEOUT, sink.send(msg)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!(conn_id = %sender_conn_id, error = %e, "WebSocket sink closed");
                    break;
                }
                Err(_) => {
                    tracing::debug!(conn_id = %sender_conn_id, "WebSocket send timed out");
                    break;
                }
            }
        }
    });

    fanout.mark_connected(&conn_id).await;
    tracing::info!(conn_id = %conn_id, channel = %channel, "WebSocket connected");

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Text(text)) if text.as_str() == PING_FRAME => {
                let pong = Message::Text(r#"{"type":"pong"}"#.into());
                fanout.send_to(&conn_id, pong).await;
            }
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {
                // Clients have no other control surface; ignore.
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove subscriber and abort the sender task.
    fanout.disconnect(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, channel = %channel, "WebSocket disconnected");
}
