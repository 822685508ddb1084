//! Bus topics.

use serde::{Deserialize, Serialize};

/// The closed set of topics carried on the event bus.
///
/// Serialized names are the dot-separated identifiers used in logs and
/// outbound payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// A new alert was persisted; payload is the serialized alert.
    #[serde(rename = "alert.created")]
    AlertCreated,
    /// An alert transitioned to resolved; payload is the updated alert.
    #[serde(rename = "alert.resolved")]
    AlertResolved,
    /// A telemetry reading was persisted; payload is the stored reading.
    #[serde(rename = "telemetry.received")]
    TelemetryReceived,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::AlertCreated => "alert.created",
            Topic::AlertResolved => "alert.resolved",
            Topic::TelemetryReceived => "telemetry.received",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
