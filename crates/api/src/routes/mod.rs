pub mod alerts;
pub mod events;
pub mod health;
pub mod telemetry;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /telemetry                      ingest (POST)
/// /telemetry/positions            latest reading per forklift
/// /telemetry/forklift/{id}        reading history
///
/// /events                         filtered listing
/// /events/critical                severity >= 4
/// /events/{id}                    single event
///
/// /alerts                         open (or all) alerts
/// /alerts/{id}                    single alert
/// /alerts/{id}/resolve            open -> resolved transition (POST)
///
/// /ws/events                      alert stream (WebSocket)
/// /ws/telemetry                   telemetry stream (WebSocket)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/telemetry", telemetry::router())
        .nest("/events", events::router())
        .nest("/alerts", alerts::router())
        .route("/ws/events", get(ws::events_ws_handler))
        .route("/ws/telemetry", get(ws::telemetry_ws_handler))
}
