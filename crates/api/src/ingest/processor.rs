//! Ingestion orchestrator.
//!
//! [`TelemetryProcessor`] turns one inbound reading into its full
//! downstream effects: a persisted telemetry row, an event/alert pair
//! per detected violation, and the matching bus notifications.

use std::sync::Arc;

use chrono::Utc;
use liftguard_core::safety::{evaluate, SafetyThresholds};
use liftguard_db::models::telemetry::{CreateTelemetry, Telemetry};
use liftguard_db::repositories::{AlertRepo, TelemetryRepo};
use liftguard_db::DbPool;
use liftguard_events::{EventBus, Topic};
use serde::Serialize;

/// Processes inbound telemetry readings.
///
/// Holds no state of its own beyond its collaborators, so any number of
/// readings can be processed concurrently; correctness rests on the
/// pool and the bus being individually safe for concurrent use.
pub struct TelemetryProcessor {
    pool: DbPool,
    bus: Arc<EventBus>,
    thresholds: SafetyThresholds,
}

impl TelemetryProcessor {
    /// Create a processor over the given collaborators.
    pub fn new(pool: DbPool, bus: Arc<EventBus>, thresholds: SafetyThresholds) -> Self {
        Self {
            pool,
            bus,
            thresholds,
        }
    }

    /// Process one reading.
    ///
    /// 1. Persist the reading, exactly once, regardless of rule outcome.
    /// 2. Evaluate the safety rules.
    /// 3. For each violation, persist an event/alert pair (a single
    ///    transaction per pair) and publish `alert.created`. A failed
    ///    pair is logged and does not stop the remaining violations,
    ///    nor does it roll back the reading.
    /// 4. Publish `telemetry.received` once.
    pub async fn process(&self, input: CreateTelemetry) -> Result<Telemetry, sqlx::Error> {
        let telemetry = TelemetryRepo::insert(&self.pool, &input).await?;
        tracing::info!(forklift_id = telemetry.forklift_id, "Telemetry saved");

        let violations = evaluate(&input.reading(), &self.thresholds, Utc::now());
        if !violations.is_empty() {
            tracing::warn!(
                count = violations.len(),
                forklift_id = telemetry.forklift_id,
                "Detected safety violations"
            );
        }

        for violation in &violations {
            match AlertRepo::insert_for_violation(&self.pool, telemetry.forklift_id, violation)
                .await
            {
                Ok((_event, alert)) => {
                    tracing::warn!(title = %alert.title, "Alert created");
                    self.bus.publish(Topic::AlertCreated, to_payload(&alert));
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        kind = %violation.kind,
                        forklift_id = telemetry.forklift_id,
                        "Failed to persist alert for violation"
                    );
                }
            }
        }

        self.bus
            .publish(Topic::TelemetryReceived, to_payload(&telemetry));

        Ok(telemetry)
    }
}

/// Serialize a record for the bus.
///
/// Serialization of our own models cannot realistically fail; if it
/// ever does, the notification degrades to `null` rather than taking
/// the ingestion down with it.
fn to_payload<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to serialize bus payload");
        serde_json::Value::Null
    })
}
