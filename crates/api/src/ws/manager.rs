use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// The closed set of broadcast channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Safety alerts.
    Events,
    /// Raw telemetry readings.
    Telemetry,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Events => "events",
            Channel::Telemetry => "telemetry",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of one subscriber.
///
/// `Connecting -> Connected -> Disconnected`, strictly forward. Only
/// `Connected` subscribers receive broadcasts; `Disconnected` is
/// terminal and coincides with removal from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

/// Metadata for a single WebSocket subscriber.
struct Subscriber {
    /// The channel this subscriber joined.
    channel: Channel,
    /// Current lifecycle state.
    state: ConnectionState,
    /// Channel sender for outbound messages to this connection.
    sender: WsSender,
}

/// Manages all live WebSocket subscribers, grouped by channel.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc`
/// and shared across the application. Delivery is non-blocking: each
/// subscriber has an unbounded mpsc queue drained by its own socket
/// task, so one dead or slow connection never delays the others.
pub struct WsFanout {
    subscribers: RwLock<HashMap<String, Subscriber>>,
}

impl WsFanout {
    /// Create a new, empty fanout.
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new subscriber on a channel, in `Connecting` state.
    ///
    /// Returns the receiver half of the message queue so the caller can
    /// forward messages to the WebSocket sink. The subscriber does not
    /// receive broadcasts until [`mark_connected`](Self::mark_connected).
    pub async fn connect(
        &self,
        conn_id: String,
        channel: Channel,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscriber = Subscriber {
            channel,
            state: ConnectionState::Connecting,
            sender: tx,
        };
        self.subscribers.write().await.insert(conn_id, subscriber);
        rx
    }

    /// Transition a subscriber from `Connecting` to `Connected`.
    ///
    /// No-op for unknown ids or subscribers already past `Connecting`.
    pub async fn mark_connected(&self, conn_id: &str) {
        if let Some(subscriber) = self.subscribers.write().await.get_mut(conn_id) {
            if subscriber.state == ConnectionState::Connecting {
                subscriber.state = ConnectionState::Connected;
            }
        }
    }

    /// Remove a subscriber from its channel. Unknown ids are a no-op.
    ///
    /// Removal is the terminal `Disconnected` state: the entry's mpsc
    /// sender drops with it, closing the delivery queue.
    pub async fn disconnect(&self, conn_id: &str) {
        self.subscribers.write().await.remove(conn_id);
    }

    /// Send a message to one specific subscriber (e.g. a pong reply).
    ///
    /// Returns `false` if the subscriber is unknown or its queue is
    /// closed.
    pub async fn send_to(&self, conn_id: &str, message: Message) -> bool {
        let subscribers = self.subscribers.read().await;
        match subscribers.get(conn_id) {
            Some(subscriber) => subscriber.sender.send(message).is_ok(),
            None => false,
        }
    }

    /// Broadcast a message to every `Connected` member of a channel.
    ///
    /// Members whose delivery queue is closed are silently dropped from
    /// the registry; a failed delivery is a disconnection, not an
    /// error. Broadcasting to an empty channel is a no-op.
    pub async fn broadcast(&self, channel: Channel, message: Message) {
        let mut dead = Vec::new();
        {
            let subscribers = self.subscribers.read().await;
            for (conn_id, subscriber) in subscribers.iter() {
                if subscriber.channel != channel
                    || subscriber.state != ConnectionState::Connected
                {
                    continue;
                }
                if subscriber.sender.send(message.clone()).is_err() {
                    dead.push(conn_id.clone());
                }
            }
        }

        // Self-healing membership: forget subscribers we can no longer
        // reach.
        if !dead.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for conn_id in dead {
                if subscribers.remove(&conn_id).is_some() {
                    tracing::debug!(conn_id = %conn_id, channel = %channel, "Removed unreachable subscriber");
                }
            }
        }
    }

    /// Number of subscribers currently registered on a channel.
    pub async fn member_count(&self, channel: Channel) -> usize {
        self.subscribers
            .read()
            .await
            .values()
            .filter(|s| s.channel == channel)
            .count()
    }

    /// Total number of registered subscribers across all channels.
    pub async fn connection_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Send a Ping frame to every subscriber.
    ///
    /// Used by the heartbeat task to keep connections alive and detect
    /// stale ones.
    pub async fn ping_all(&self) {
        let subscribers = self.subscribers.read().await;
        for subscriber in subscribers.values() {
            let _ = subscriber.sender.send(Message::Ping(Bytes::new()));
        }
    }

    /// Send a Close frame to every subscriber, then clear the registry.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops accepting new connections.
    pub async fn shutdown_all(&self) {
        let mut subscribers = self.subscribers.write().await;
        let count = subscribers.len();
        for subscriber in subscribers.values() {
            let _ = subscriber.sender.send(Message::Close(None));
        }
        subscribers.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }
}

impl Default for WsFanout {
    fn default() -> Self {
        Self::new()
    }
}
