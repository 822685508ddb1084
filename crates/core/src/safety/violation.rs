//! Violation types produced by the safety engine.

use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// The closed set of safety rules.
///
/// Serialized names are the wire/storage identifiers carried on events
/// and alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    /// Excessive total G-force across all three acceleration axes.
    #[serde(rename = "impact_detection")]
    Impact,
    /// Speed above the configured limit.
    #[serde(rename = "speed_violation")]
    Speed,
    /// Mast tilted beyond the limit while carrying a significant load.
    #[serde(rename = "mast_tilt_violation")]
    MastTilt,
    /// Sudden stop: forward-axis deceleration above the limit.
    #[serde(rename = "excessive_braking")]
    HarshBraking,
    /// Operation outside the authorized working-hours window.
    #[serde(rename = "outside_hours")]
    OutsideHours,
    /// Two tracked positions closer than the safe distance.
    #[serde(rename = "proximity_violation")]
    Proximity,
}

impl RuleKind {
    /// Storage identifier, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::Impact => "impact_detection",
            RuleKind::Speed => "speed_violation",
            RuleKind::MastTilt => "mast_tilt_violation",
            RuleKind::HarshBraking => "excessive_braking",
            RuleKind::OutsideHours => "outside_hours",
            RuleKind::Proximity => "proximity_violation",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected rule breach.
///
/// Ephemeral: produced by the engine, converted into a persisted
/// event/alert pair by the ingestion pipeline, and dropped. Never stored
/// or sent anywhere in this form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub kind: RuleKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub recommendation: String,
    /// Rule-specific measurements (observed value, threshold, inputs).
    pub metadata: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_kind_serializes_to_storage_names() {
        let json = serde_json::to_string(&RuleKind::Impact).unwrap();
        assert_eq!(json, "\"impact_detection\"");
        let json = serde_json::to_string(&RuleKind::HarshBraking).unwrap();
        assert_eq!(json, "\"excessive_braking\"");
    }

    #[test]
    fn rule_kind_round_trips() {
        for kind in [
            RuleKind::Impact,
            RuleKind::Speed,
            RuleKind::MastTilt,
            RuleKind::HarshBraking,
            RuleKind::OutsideHours,
            RuleKind::Proximity,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            let back: RuleKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
