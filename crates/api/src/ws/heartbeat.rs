use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WsFanout;

/// Interval between heartbeat pings (in seconds).
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Spawn a background task that sends periodic Ping frames to all
/// connected WebSocket clients.
///
/// The task runs until aborted by the shutdown path. The returned
/// `JoinHandle` can be used to abort it explicitly.
pub fn start_heartbeat(fanout: Arc<WsFanout>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));

        loop {
            interval.tick().await;
            let count = fanout.connection_count().await;
            tracing::debug!(count, "WebSocket heartbeat ping");
            fanout.ping_all().await;
        }
    })
}
