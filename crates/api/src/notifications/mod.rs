//! Live-update delivery: routes bus events to WebSocket subscribers.

mod bridge;

pub use bridge::BroadcastBridge;
