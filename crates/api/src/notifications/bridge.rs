//! Event-bus to WebSocket broadcast bridge.
//!
//! Bus dispatch is synchronous, so the subscribers registered here never
//! touch the socket path directly: they render the outbound frame and
//! push it onto an unbounded queue, which returns immediately. A single
//! background task drains the queue and performs the actual channel
//! broadcasts. One queue means frames leave in publish order, and a
//! slow or dead client can never stall telemetry ingestion.

use std::sync::Arc;

use axum::extract::ws::Message;
use liftguard_events::{EventBus, Topic};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::ws::{Channel, WsFanout};

/// One rendered frame waiting for delivery.
struct OutboundFrame {
    channel: Channel,
    message: Message,
}

/// Connects the event bus to the WebSocket fanout.
pub struct BroadcastBridge;

impl BroadcastBridge {
    /// Register bus subscriptions and spawn the delivery task.
    ///
    /// Subscribes to `alert.created` (delivered on the `events` channel)
    /// and `telemetry.received` (delivered on the `telemetry` channel).
    /// The delivery task runs until `cancel` fires or the queue closes.
    pub fn start(
        bus: &EventBus,
        fanout: Arc<WsFanout>,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<OutboundFrame>();

        let queue = tx.clone();
        bus.subscribe(Topic::AlertCreated, move |event| {
            let frame = OutboundFrame {
                channel: Channel::Events,
                message: render_frame("event", &event.payload),
            };
            queue.send(frame).map_err(|_| "broadcast queue closed")?;
            Ok(())
        });

        let queue = tx;
        bus.subscribe(Topic::TelemetryReceived, move |event| {
            let frame = OutboundFrame {
                channel: Channel::Telemetry,
                message: render_frame("telemetry", &event.payload),
            };
            queue.send(frame).map_err(|_| "broadcast queue closed")?;
            Ok(())
        });

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = cancel.cancelled() => {
                        tracing::info!("Broadcast bridge shutting down");
                        break;
                    }
                    frame = rx.recv() => match frame {
                        Some(frame) => fanout.broadcast(frame.channel, frame.message).await,
                        None => break,
                    }
                }
            }
        })
    }
}

/// Render the outbound envelope `{"type": ..., "data": ...}`.
fn render_frame(frame_type: &str, data: &serde_json::Value) -> Message {
    let body = serde_json::json!({
        "type": frame_type,
        "data": data,
    });
    Message::Text(body.to_string().into())
}
