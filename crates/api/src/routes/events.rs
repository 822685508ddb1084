//! Route definitions for safety event endpoints.

use axum::routing::get;
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET /                      -> list_events
/// GET /critical              -> list_critical_events
/// GET /{id}                  -> get_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list_events))
        .route("/critical", get(events::list_critical_events))
        .route("/{id}", get(events::get_event))
}
