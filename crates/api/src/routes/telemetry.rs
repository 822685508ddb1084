//! Route definitions for telemetry endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::telemetry;
use crate::state::AppState;

/// Routes mounted at `/telemetry`.
///
/// ```text
/// POST /                     -> ingest
/// GET  /positions            -> latest_positions
/// GET  /forklift/{id}        -> forklift_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(telemetry::ingest))
        .route("/positions", get(telemetry::latest_positions))
        .route("/forklift/{id}", get(telemetry::forklift_history))
}
