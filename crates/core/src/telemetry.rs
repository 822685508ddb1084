//! Transient telemetry reading consumed by the safety engine.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// One telemetry sample from a forklift.
///
/// Only `forklift_id` and `timestamp` are mandatory; every sensor field
/// is optional because edge devices report different subsets. Absence is
/// expressed through `Option`; a present zero is a real measurement and
/// is evaluated by the rules like any other value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReading {
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
