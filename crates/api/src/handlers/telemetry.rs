//! Handlers for telemetry ingestion and queries.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use liftguard_core::error::CoreError;
use liftguard_core::types::{DbId, Timestamp};
use liftguard_db::models::telemetry::{CreateTelemetry, Telemetry};
use liftguard_db::repositories::TelemetryRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Hard cap on page sizes across the listing endpoints.
pub(crate) const MAX_PAGE_SIZE: i64 = 1000;

/// Default page size when the client does not ask for one.
pub(crate) const DEFAULT_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for the telemetry ingest endpoint.
///
/// `forklift_id` and `timestamp` are mandatory; a payload without them
/// is a client fault rejected before it reaches the pipeline. Sensor
/// fields are optional but range-checked when present.
#[derive(Debug, Deserialize, Validate)]
pub struct IngestTelemetryRequest {
    pub forklift_id: DbId,
    pub timestamp: Timestamp,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(range(min = 0.0))]
    pub speed_kmh: Option<f64>,
    pub acceleration_x: Option<f64>,
    pub acceleration_y: Option<f64>,
    pub acceleration_z: Option<f64>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub mast_tilt_deg: Option<f64>,
    #[validate(range(min = 0.0))]
    pub load_weight_kg: Option<f64>,
    #[validate(range(min = 0.0))]
    pub mast_height_m: Option<f64>,
    #[validate(length(max = 50))]
    pub operator_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl From<IngestTelemetryRequest> for CreateTelemetry {
    fn from(input: IngestTelemetryRequest) -> Self {
        CreateTelemetry {
            forklift_id: input.forklift_id,
            timestamp: input.timestamp,
            latitude: input.latitude,
            longitude: input.longitude,
            speed_kmh: input.speed_kmh,
            acceleration_x: input.acceleration_x,
            acceleration_y: input.acceleration_y,
            acceleration_z: input.acceleration_z,
            mast_tilt_deg: input.mast_tilt_deg,
            load_weight_kg: input.load_weight_kg,
            mast_height_m: input.mast_height_m,
            operator_id: input.operator_id,
            metadata: input.metadata,
        }
    }
}

/// Skip/limit pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Clamp pagination inputs to sane bounds: non-negative skip, limit in
/// [1, 1000]. Returns `(skip, limit)`.
pub(crate) fn page_bounds(skip: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let skip = skip.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (skip, limit)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /telemetry
///
/// Ingest one reading: persist it, evaluate the safety rules, create
/// alerts for violations, and broadcast live updates.
pub async fn ingest(
    State(state): State<AppState>,
    Json(input): Json<IngestTelemetryRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Telemetry>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let telemetry = state.processor.process(input.into()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: telemetry })))
}

/// GET /telemetry/positions
///
/// Latest reading per forklift, for the live map view.
pub async fn latest_positions(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Telemetry>>>> {
    let positions = TelemetryRepo::latest_positions(&state.pool).await?;
    Ok(Json(DataResponse { data: positions }))
}

/// GET /telemetry/forklift/{id}
///
/// Reading history for one forklift, newest first.
pub async fn forklift_history(
    State(state): State<AppState>,
    Path(forklift_id): Path<DbId>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<DataResponse<Vec<Telemetry>>>> {
    let (skip, limit) = page_bounds(pagination.skip, pagination.limit);
    let history = TelemetryRepo::list_for_forklift(&state.pool, forklift_id, limit, skip).await?;
    Ok(Json(DataResponse { data: history }))
}
