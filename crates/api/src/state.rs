use std::sync::Arc;

use crate::config::ServerConfig;
use crate::ingest::TelemetryProcessor;
use crate::ws::WsFanout;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// Every collaborator is an explicitly constructed instance (no
/// process-wide singletons) so tests can build isolated pipelines.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: liftguard_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket fanout for live subscribers.
    pub fanout: Arc<WsFanout>,
    /// Centralized event bus.
    pub event_bus: Arc<liftguard_events::EventBus>,
    /// Telemetry ingestion pipeline.
    pub processor: Arc<TelemetryProcessor>,
}
