//! Telemetry entity model and ingest DTO.

use liftguard_core::types::{DbId, Timestamp};
use liftguard_core::TelemetryReading;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `telemetry` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Telemetry {
    pub id: DbId,
    pub timestamp: Timestamp,
    pub forklift_id: DbId,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed_kmh: Option<f64>,
    pub acceleration_x: Option<f64>,
    pub acceleration_y: Option<f64>,
    pub acceleration_z: Option<f64>,
    pub mast_tilt_deg: Option<f64>,
    pub load_weight_kg: Option<f64>,
    pub mast_height_m: Option<f64>,
    pub operator_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// DTO for inserting a telemetry row.
///
/// `forklift_id` and `timestamp` are mandatory; everything else follows
/// whatever the edge device reported.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTelemetry {
    pub forklift_id: DbId,
    pub timestamp: Timestamp,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed_kmh: Option<f64>,
    pub acceleration_x: Option<f64>,
    pub acceleration_y: Option<f64>,
    pub acceleration_z: Option<f64>,
    pub mast_tilt_deg: Option<f64>,
    pub load_weight_kg: Option<f64>,
    pub mast_height_m: Option<f64>,
    pub operator_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl CreateTelemetry {
    /// The transient reading handed to the safety engine.
    pub fn reading(&self) -> TelemetryReading {
        TelemetryReading {
            forklift_id: self.forklift_id,
            timestamp: self.timestamp,
            latitude: self.latitude,
            longitude: self.longitude,
            speed_kmh: self.speed_kmh,
            acceleration_x: self.acceleration_x,
            acceleration_y: self.acceleration_y,
            acceleration_z: self.acceleration_z,
            mast_tilt_deg: self.mast_tilt_deg,
            load_weight_kg: self.load_weight_kg,
            mast_height_m: self.mast_height_m,
            operator_id: self.operator_id.clone(),
            metadata: self.metadata.clone(),
        }
    }
}
