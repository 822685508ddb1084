//! Rule evaluation.
//!
//! `evaluate` applies every telemetry rule to one reading and returns the
//! violations in fixed rule order. A rule whose inputs are absent is
//! silently skipped; missing data is normal, not an error. Presence is
//! judged by `Option` alone, so a measured zero participates in the
//! checks.

use chrono::Timelike;
use serde_json::json;

use crate::severity::Severity;
use crate::telemetry::TelemetryReading;
use crate::types::Timestamp;

use super::thresholds::SafetyThresholds;
use super::violation::{RuleKind, Violation};

/// Earth radius in meters, used by the haversine distance.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Loads at or below this weight (kg) do not arm the mast-tilt rule.
const TILT_LOAD_FLOOR_KG: f64 = 10.0;

/// Evaluate one reading against every telemetry rule.
///
/// `now` is the evaluation instant used by the working-hours rule; the
/// caller supplies it so the function stays deterministic for a given
/// input. Rules run in fixed order and are independent: a single
/// reading can produce several violations.
pub fn evaluate(
    reading: &TelemetryReading,
    thresholds: &SafetyThresholds,
    now: Timestamp,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if let Some(v) = check_impact(reading, thresholds) {
        violations.push(v);
    }
    if let Some(v) = check_speed(reading, thresholds) {
        violations.push(v);
    }
    if let Some(v) = check_mast_tilt(reading, thresholds) {
        violations.push(v);
    }
    if let Some(v) = check_braking(reading, thresholds) {
        violations.push(v);
    }
    if let Some(v) = check_operating_hours(reading, thresholds, now) {
        violations.push(v);
    }

    violations
}

/// Impact detection: total acceleration magnitude across all three axes.
fn check_impact(reading: &TelemetryReading, thresholds: &SafetyThresholds) -> Option<Violation> {
    let (ax, ay, az) = match (
        reading.acceleration_x,
        reading.acceleration_y,
        reading.acceleration_z,
    ) {
        (Some(x), Some(y), Some(z)) => (x, y, z),
        _ => return None,
    };

    let total_g = (ax * ax + ay * ay + az * az).sqrt();
    if total_g <= thresholds.impact_threshold_g {
        return None;
    }

    let severity = if total_g > thresholds.impact_threshold_g * 1.5 {
        Severity::Critical
    } else {
        Severity::High
    };

    Some(Violation {
        kind: RuleKind::Impact,
        severity,
        title: format!("Impact Detected: {total_g:.2}G"),
        description: format!(
            "Forklift experienced impact of {total_g:.2}G, exceeding threshold of {}G",
            thresholds.impact_threshold_g
        ),
        recommendation: "Immediate inspection required. Check for damage to forklift and cargo. \
                         Review operator training."
            .to_string(),
        metadata: json!({
            "total_g_force": total_g,
            "threshold": thresholds.impact_threshold_g,
            "acceleration_x": ax,
            "acceleration_y": ay,
            "acceleration_z": az,
        }),
    })
}

/// Dangerous speed.
fn check_speed(reading: &TelemetryReading, thresholds: &SafetyThresholds) -> Option<Violation> {
    let speed_kmh = reading.speed_kmh?;
    if speed_kmh <= thresholds.speed_threshold_kmh {
        return None;
    }

    let severity = if speed_kmh > thresholds.speed_threshold_kmh * 1.5 {
        Severity::Critical
    } else {
        Severity::High
    };

    Some(Violation {
        kind: RuleKind::Speed,
        severity,
        title: format!("Excessive Speed: {speed_kmh:.1} km/h"),
        description: format!(
            "Forklift traveling at {speed_kmh:.1} km/h, exceeding safe limit of {} km/h",
            thresholds.speed_threshold_kmh
        ),
        recommendation: "Reduce speed immediately. Review warehouse speed limits with operator."
            .to_string(),
        metadata: json!({
            "speed_kmh": speed_kmh,
            "threshold": thresholds.speed_threshold_kmh,
        }),
    })
}

/// Mast tilted beyond the limit while carrying a significant load.
fn check_mast_tilt(reading: &TelemetryReading, thresholds: &SafetyThresholds) -> Option<Violation> {
    let tilt_deg = reading.mast_tilt_deg?;
    let load_kg = reading.load_weight_kg?;

    if load_kg <= TILT_LOAD_FLOOR_KG || tilt_deg.abs() <= thresholds.tilt_threshold_deg {
        return None;
    }

    let severity = if tilt_deg.abs() > thresholds.tilt_threshold_deg * 1.5 {
        Severity::Critical
    } else {
        Severity::High
    };

    Some(Violation {
        kind: RuleKind::MastTilt,
        severity,
        title: format!("Dangerous Mast Tilt: {tilt_deg:.1}°"),
        description: format!("Mast tilted {tilt_deg:.1}° while carrying {load_kg:.0}kg load"),
        recommendation: "Level the forklift immediately. Risk of load falling and tip-over. \
                         Ensure stable ground."
            .to_string(),
        metadata: json!({
            "mast_tilt_deg": tilt_deg,
            "load_weight_kg": load_kg,
            "threshold": thresholds.tilt_threshold_deg,
        }),
    })
}

/// Excessive braking force (sudden stop).
///
/// Negative X acceleration is braking; forward is +X by convention.
fn check_braking(reading: &TelemetryReading, thresholds: &SafetyThresholds) -> Option<Violation> {
    let ax = reading.acceleration_x?;
    let braking_force = ax.min(0.0).abs();

    if braking_force <= thresholds.braking_threshold_g {
        return None;
    }

    let severity = if braking_force > thresholds.braking_threshold_g * 1.5 {
        Severity::High
    } else {
        Severity::Moderate
    };

    Some(Violation {
        kind: RuleKind::HarshBraking,
        severity,
        title: format!("Harsh Braking: {braking_force:.2}G"),
        description: format!("Sudden braking detected with force of {braking_force:.2}G"),
        recommendation: "Review operating conditions. Check for obstacles or unsafe following \
                         distance."
            .to_string(),
        metadata: json!({
            "braking_force_g": braking_force,
            "threshold": thresholds.braking_threshold_g,
            "speed_kmh": reading.speed_kmh,
        }),
    })
}

/// Operation outside the authorized working-hours window.
///
/// Judged against the evaluation instant, not the reading's own
/// timestamp: delayed or batched readings are still attributed to the
/// hour they are processed in.
fn check_operating_hours(
    reading: &TelemetryReading,
    thresholds: &SafetyThresholds,
    now: Timestamp,
) -> Option<Violation> {
    let current_hour = now.hour();
    if current_hour >= thresholds.work_start_hour && current_hour < thresholds.work_end_hour {
        return None;
    }

    Some(Violation {
        kind: RuleKind::OutsideHours,
        severity: Severity::Moderate,
        title: "Operation Outside Authorized Hours".to_string(),
        description: format!(
            "Forklift operation detected at {current_hour:02}:00, outside authorized hours \
             ({:02}:00 - {:02}:00)",
            thresholds.work_start_hour, thresholds.work_end_hour
        ),
        recommendation: "Verify authorization for after-hours operation. Ensure proper \
                         supervision and lighting."
            .to_string(),
        metadata: json!({
            "current_hour": current_hour,
            "work_start_hour": thresholds.work_start_hour,
            "work_end_hour": thresholds.work_end_hour,
            "operator_id": reading.operator_id,
        }),
    })
}

/// Proximity check between one forklift and a set of other tracked positions.
///
/// Reports only the first neighbor inside the danger radius, a
/// deliberate cost bound, not an oversight. Positions are (latitude,
/// longitude) pairs.
pub fn check_proximity(
    forklift_position: (f64, f64),
    other_positions: &[(f64, f64)],
    thresholds: &SafetyThresholds,
) -> Option<Violation> {
    for &other in other_positions {
        let distance = haversine_distance_m(forklift_position, other);
        if distance >= thresholds.proximity_threshold_m {
            continue;
        }

        let severity = if distance < thresholds.proximity_threshold_m / 2.0 {
            Severity::Critical
        } else {
            Severity::High
        };

        return Some(Violation {
            kind: RuleKind::Proximity,
            severity,
            title: format!("Dangerous Proximity: {distance:.1}m"),
            description: format!(
                "Forklift within {distance:.1}m of another object (threshold: {}m)",
                thresholds.proximity_threshold_m
            ),
            recommendation: "Maintain safe distance. Slow down and use horn to alert nearby \
                             personnel."
                .to_string(),
            metadata: json!({
                "distance_meters": distance,
                "threshold": thresholds.proximity_threshold_m,
            }),
        });
    }

    None
}

/// Great-circle distance in meters between two (latitude, longitude)
/// points, via the haversine formula.
pub fn haversine_distance_m(pos1: (f64, f64), pos2: (f64, f64)) -> f64 {
    let (lat1, lon1) = pos1;
    let (lat2, lon2) = pos2;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
