//! Route definitions for alert endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

/// Routes mounted at `/alerts`.
///
/// ```text
/// GET  /                     -> list_alerts
/// GET  /{id}                 -> get_alert
/// POST /{id}/resolve         -> resolve_alert
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(alerts::list_alerts))
        .route("/{id}", get(alerts::get_alert))
        .route("/{id}/resolve", post(alerts::resolve_alert))
}
