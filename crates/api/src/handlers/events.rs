//! Handlers for safety event queries.

use axum::extract::{Path, Query, State};
use axum::Json;
use liftguard_core::error::CoreError;
use liftguard_core::types::DbId;
use liftguard_db::models::event::Event;
use liftguard_db::repositories::{EventFilter, EventRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::telemetry::{page_bounds, Pagination};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the event listing endpoint.
#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    pub severity: Option<i16>,
    pub kind: Option<String>,
    pub forklift_id: Option<DbId>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /events
///
/// List events, optionally filtered by severity, kind, or forklift.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    if let Some(severity) = query.severity {
        if !(1..=5).contains(&severity) {
            return Err(AppError::BadRequest(
                "severity must be between 1 and 5".to_string(),
            ));
        }
    }

    let (skip, limit) = page_bounds(query.skip, query.limit);
    let filter = EventFilter {
        severity: query.severity,
        kind: query.kind,
        forklift_id: query.forklift_id,
    };
    let events = EventRepo::list(&state.pool, &filter, limit, skip).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /events/critical
///
/// High-severity events (severity 4 and above), newest first.
pub async fn list_critical_events(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let (skip, limit) = page_bounds(pagination.skip, pagination.limit);
    let events = EventRepo::list_critical(&state.pool, limit, skip).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Event>>> {
    let event = EventRepo::get(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "event", id })?;
    Ok(Json(DataResponse { data: event }))
}
