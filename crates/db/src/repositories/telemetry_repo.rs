//! Repository for the `telemetry` table.

use liftguard_core::types::DbId;
use sqlx::PgPool;

use crate::models::telemetry::{CreateTelemetry, Telemetry};

/// Column list for `telemetry` queries.
const TELEMETRY_COLUMNS: &str = "id, timestamp, forklift_id, latitude, longitude, speed_kmh, \
     acceleration_x, acceleration_y, acceleration_z, mast_tilt_deg, load_weight_kg, \
     mast_height_m, operator_id, metadata";

/// Provides read/write operations for telemetry readings.
pub struct TelemetryRepo;

impl TelemetryRepo {
    /// Insert a new telemetry row, returning the persisted record.
    pub async fn insert(pool: &PgPool, input: &CreateTelemetry) -> Result<Telemetry, sqlx::Error> {
        let query = format!(
            "INSERT INTO telemetry \
                (timestamp, forklift_id, latitude, longitude, speed_kmh, \
                 acceleration_x, acceleration_y, acceleration_z, mast_tilt_deg, \
                 load_weight_kg, mast_height_m, operator_id, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {TELEMETRY_COLUMNS}"
        );
        sqlx::query_as::<_, Telemetry>(&query)
            .bind(input.timestamp)
            .bind(input.forklift_id)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.speed_kmh)
            .bind(input.acceleration_x)
            .bind(input.acceleration_y)
            .bind(input.acceleration_z)
            .bind(input.mast_tilt_deg)
            .bind(input.load_weight_kg)
            .bind(input.mast_height_m)
            .bind(input.operator_id.as_deref())
            .bind(input.metadata.as_ref())
            .fetch_one(pool)
            .await
    }

    /// History for one forklift, newest first.
    pub async fn list_for_forklift(
        pool: &PgPool,
        forklift_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Telemetry>, sqlx::Error> {
        let query = format!(
            "SELECT {TELEMETRY_COLUMNS} FROM telemetry \
             WHERE forklift_id = $1 \
             ORDER BY timestamp DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Telemetry>(&query)
            .bind(forklift_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// The most recent reading per forklift, for the live map view.
    pub async fn latest_positions(pool: &PgPool) -> Result<Vec<Telemetry>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT ON (forklift_id) {TELEMETRY_COLUMNS} FROM telemetry \
             ORDER BY forklift_id, timestamp DESC"
        );
        sqlx::query_as::<_, Telemetry>(&query).fetch_all(pool).await
    }
}
