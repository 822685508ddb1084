//! Threshold configuration for the safety engine.

use serde::{Deserialize, Serialize};

/// Limits the safety rules compare readings against.
///
/// Loaded once at process start (see the API crate's config module) and
/// immutable afterwards; the engine only ever borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyThresholds {
    /// Total G-force above which an impact is reported.
    pub impact_threshold_g: f64,
    /// Speed limit in km/h.
    pub speed_threshold_kmh: f64,
    /// Mast tilt limit in degrees (applies only when loaded).
    pub tilt_threshold_deg: f64,
    /// Forward-axis deceleration limit in G.
    pub braking_threshold_g: f64,
    /// Minimum safe distance between tracked positions, in meters.
    pub proximity_threshold_m: f64,
    /// First hour (inclusive) of the authorized working window.
    pub work_start_hour: u32,
    /// End hour (exclusive) of the authorized working window.
    pub work_end_hour: u32,
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self {
            impact_threshold_g: 2.5,
            speed_threshold_kmh: 25.0,
            tilt_threshold_deg: 15.0,
            braking_threshold_g: 1.5,
            proximity_threshold_m: 3.0,
            work_start_hour: 6,
            work_end_hour: 22,
        }
    }
}
