//! Integration tests for the pipeline repositories.
//!
//! Exercises the repository layer against a real database:
//! - Telemetry insert and time-ordered queries
//! - Event/alert pair creation from a violation (single transaction)
//! - Alert resolution transition semantics
//! - Event listing filters

use chrono::{Duration, TimeZone, Utc};
use liftguard_core::safety::{evaluate, SafetyThresholds};
use liftguard_core::types::Timestamp;
use liftguard_db::models::telemetry::CreateTelemetry;
use liftguard_db::repositories::{AlertRepo, EventFilter, EventRepo, TelemetryRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn base_time() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap()
}

fn new_reading(forklift_id: i64, timestamp: Timestamp) -> CreateTelemetry {
    CreateTelemetry {
        forklift_id,
        timestamp,
        latitude: Some(40.7580),
        longitude: Some(-73.9855),
        speed_kmh: Some(12.0),
        acceleration_x: Some(0.2),
        acceleration_y: Some(0.1),
        acceleration_z: Some(0.1),
        mast_tilt_deg: Some(2.0),
        load_weight_kg: Some(150.0),
        mast_height_m: Some(1.2),
        operator_id: Some("op-7".to_string()),
        metadata: None,
    }
}

/// A reading that trips the speed rule (30 > 25, below the 1.5x band).
fn speeding_reading(forklift_id: i64) -> CreateTelemetry {
    CreateTelemetry {
        speed_kmh: Some(30.0),
        ..new_reading(forklift_id, base_time())
    }
}

// ---------------------------------------------------------------------------
// Telemetry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_returns_persisted_reading(pool: PgPool) {
    let input = new_reading(1, base_time());
    let row = TelemetryRepo::insert(&pool, &input).await.unwrap();

    assert!(row.id > 0);
    assert_eq!(row.forklift_id, 1);
    assert_eq!(row.timestamp, base_time());
    assert_eq!(row.speed_kmh, Some(12.0));
    assert_eq!(row.operator_id.as_deref(), Some("op-7"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn history_is_newest_first_and_scoped_to_forklift(pool: PgPool) {
    for minutes in 0..3i64 {
        let input = new_reading(1, base_time() + Duration::minutes(minutes));
        TelemetryRepo::insert(&pool, &input).await.unwrap();
    }
    TelemetryRepo::insert(&pool, &new_reading(2, base_time()))
        .await
        .unwrap();

    let history = TelemetryRepo::list_for_forklift(&pool, 1, 100, 0)
        .await
        .unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].timestamp, base_time() + Duration::minutes(2));
    assert!(history.iter().all(|t| t.forklift_id == 1));
}

#[sqlx::test(migrations = "../../migrations")]
async fn latest_positions_returns_one_row_per_forklift(pool: PgPool) {
    for forklift_id in [1, 2] {
        for minutes in 0..2i64 {
            let input = new_reading(forklift_id, base_time() + Duration::minutes(minutes));
            TelemetryRepo::insert(&pool, &input).await.unwrap();
        }
    }

    let mut positions = TelemetryRepo::latest_positions(&pool).await.unwrap();
    positions.sort_by_key(|t| t.forklift_id);

    assert_eq!(positions.len(), 2);
    for row in &positions {
        assert_eq!(row.timestamp, base_time() + Duration::minutes(1));
    }
}

// ---------------------------------------------------------------------------
// Event/alert pairs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn violation_becomes_linked_event_and_alert(pool: PgPool) {
    let input = speeding_reading(9);
    let violations = evaluate(&input.reading(), &SafetyThresholds::default(), base_time());
    assert_eq!(violations.len(), 1);

    let (event, alert) = AlertRepo::insert_for_violation(&pool, 9, &violations[0])
        .await
        .unwrap();

    assert_eq!(event.kind, "speed_violation");
    assert_eq!(event.severity, 4);
    assert_eq!(event.source, "forklift_9");
    assert_eq!(event.forklift_id, Some(9));

    assert_eq!(alert.event_id, event.id);
    assert_eq!(alert.rule_kind, "speed_violation");
    assert_eq!(alert.severity, 4);
    assert!(!alert.is_resolved);
    assert!(alert.resolved_at.is_none());
    assert!(alert.resolved_by.is_none());
    assert!(alert.title.contains("30.0 km/h"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn second_alert_for_same_event_is_rejected(pool: PgPool) {
    let input = speeding_reading(3);
    let violations = evaluate(&input.reading(), &SafetyThresholds::default(), base_time());
    let (event, _alert) = AlertRepo::insert_for_violation(&pool, 3, &violations[0])
        .await
        .unwrap();

    // The unique constraint on event_id enforces the 1:1 invariant.
    let result = sqlx::query(
        "INSERT INTO alerts (event_id, rule_kind, severity, title, description) \
         VALUES ($1, 'speed_violation', 4, 't', 'd')",
    )
    .bind(event.id)
    .execute(&pool)
    .await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Alert resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn resolve_sets_resolution_fields_exactly_once(pool: PgPool) {
    let input = speeding_reading(4);
    let violations = evaluate(&input.reading(), &SafetyThresholds::default(), base_time());
    let (_event, alert) = AlertRepo::insert_for_violation(&pool, 4, &violations[0])
        .await
        .unwrap();

    let resolved = AlertRepo::resolve(&pool, alert.id, 42)
        .await
        .unwrap()
        .expect("open alert should resolve");
    assert!(resolved.is_resolved);
    assert_eq!(resolved.resolved_by, Some(42));
    assert!(resolved.resolved_at.is_some());

    // A second resolution attempt finds no open alert.
    let again = AlertRepo::resolve(&pool, alert.id, 99).await.unwrap();
    assert!(again.is_none());

    // The original resolver is untouched.
    let current = AlertRepo::get(&pool, alert.id).await.unwrap().unwrap();
    assert_eq!(current.resolved_by, Some(42));
}

#[sqlx::test(migrations = "../../migrations")]
async fn resolve_unknown_alert_returns_none(pool: PgPool) {
    let result = AlertRepo::resolve(&pool, 12345, 1).await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn open_alert_listing_excludes_resolved(pool: PgPool) {
    for forklift_id in [1, 2] {
        let input = speeding_reading(forklift_id);
        let violations = evaluate(&input.reading(), &SafetyThresholds::default(), base_time());
        AlertRepo::insert_for_violation(&pool, forklift_id, &violations[0])
            .await
            .unwrap();
    }

    let open = AlertRepo::list(&pool, false, 100, 0).await.unwrap();
    assert_eq!(open.len(), 2);

    AlertRepo::resolve(&pool, open[0].id, 7).await.unwrap();

    let open = AlertRepo::list(&pool, false, 100, 0).await.unwrap();
    assert_eq!(open.len(), 1);
    let all = AlertRepo::list(&pool, true, 100, 0).await.unwrap();
    assert_eq!(all.len(), 2);
}

// ---------------------------------------------------------------------------
// Event queries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn event_filters_narrow_the_listing(pool: PgPool) {
    // One speed violation (severity 4) and one critical impact (severity 5).
    let speeding = speeding_reading(1);
    let violations = evaluate(
        &speeding.reading(),
        &SafetyThresholds::default(),
        base_time(),
    );
    AlertRepo::insert_for_violation(&pool, 1, &violations[0])
        .await
        .unwrap();

    let crashing = CreateTelemetry {
        acceleration_x: Some(4.0),
        acceleration_y: Some(0.0),
        acceleration_z: Some(0.0),
        ..new_reading(2, base_time())
    };
    let violations = evaluate(
        &crashing.reading(),
        &SafetyThresholds::default(),
        base_time(),
    );
    AlertRepo::insert_for_violation(&pool, 2, &violations[0])
        .await
        .unwrap();

    let all = EventRepo::list(&pool, &EventFilter::default(), 100, 0)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let filter = EventFilter {
        kind: Some("speed_violation".to_string()),
        ..EventFilter::default()
    };
    let speed_only = EventRepo::list(&pool, &filter, 100, 0).await.unwrap();
    assert_eq!(speed_only.len(), 1);
    assert_eq!(speed_only[0].forklift_id, Some(1));

    let filter = EventFilter {
        severity: Some(5),
        ..EventFilter::default()
    };
    let critical_only = EventRepo::list(&pool, &filter, 100, 0).await.unwrap();
    assert_eq!(critical_only.len(), 1);
    assert_eq!(critical_only[0].kind, "impact_detection");

    // list_critical covers severity >= 4, so both qualify.
    let critical = EventRepo::list_critical(&pool, 100, 0).await.unwrap();
    assert_eq!(critical.len(), 2);

    let fetched = EventRepo::get(&pool, all[0].id).await.unwrap();
    assert!(fetched.is_some());
    assert!(EventRepo::get(&pool, 999_999).await.unwrap().is_none());
}
