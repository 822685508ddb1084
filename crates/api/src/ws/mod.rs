//! WebSocket infrastructure for real-time event and telemetry streaming.
//!
//! Provides the channel-grouped connection manager, heartbeat
//! monitoring, and the HTTP upgrade handlers used by Axum routes.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::{events_ws_handler, telemetry_ws_handler};
pub use heartbeat::start_heartbeat;
pub use manager::{Channel, ConnectionState, WsFanout};
