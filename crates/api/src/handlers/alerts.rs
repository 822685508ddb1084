//! Handlers for alert queries and resolution.

use axum::extract::{Path, Query, State};
use axum::Json;
use liftguard_core::error::CoreError;
use liftguard_core::types::DbId;
use liftguard_db::models::alert::Alert;
use liftguard_db::repositories::AlertRepo;
use liftguard_events::Topic;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::telemetry::page_bounds;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the alert listing endpoint.
#[derive(Debug, Deserialize)]
pub struct AlertListQuery {
    /// Include resolved alerts (default: open alerts only).
    #[serde(default)]
    pub include_resolved: bool,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Request body for resolving an alert.
#[derive(Debug, Deserialize)]
pub struct ResolveAlertRequest {
    pub resolved_by: DbId,
}

/// GET /alerts
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertListQuery>,
) -> AppResult<Json<DataResponse<Vec<Alert>>>> {
    let (skip, limit) = page_bounds(query.skip, query.limit);
    let alerts = AlertRepo::list(&state.pool, query.include_resolved, limit, skip).await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// GET /alerts/{id}
pub async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Alert>>> {
    let alert = AlertRepo::get(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "alert", id })?;
    Ok(Json(DataResponse { data: alert }))
}

/// POST /alerts/{id}/resolve
///
/// Perform the open-to-resolved transition. The transition happens at
/// most once: a second attempt is a conflict, an unknown id a 404. On
/// success the updated alert is published as `alert.resolved`.
pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ResolveAlertRequest>,
) -> AppResult<Json<DataResponse<Alert>>> {
    match AlertRepo::resolve(&state.pool, id, input.resolved_by).await? {
        Some(alert) => {
            tracing::info!(alert_id = alert.id, resolved_by = input.resolved_by, "Alert resolved");
            match serde_json::to_value(&alert) {
                Ok(payload) => state.event_bus.publish(Topic::AlertResolved, payload),
                Err(e) => tracing::error!(error = %e, "Failed to serialize resolved alert"),
            }
            Ok(Json(DataResponse { data: alert }))
        }
        None => {
            // Distinguish "unknown" from "already resolved".
            match AlertRepo::get(&state.pool, id).await? {
                Some(_) => Err(AppError::Core(CoreError::Conflict(format!(
                    "alert {id} is already resolved"
                )))),
                None => Err(AppError::Core(CoreError::NotFound {
                    entity: "alert",
                    id,
                })),
            }
        }
    }
}
