//! Repository for the `alerts` table.

use liftguard_core::safety::Violation;
use liftguard_core::types::DbId;
use sqlx::PgPool;

use crate::models::alert::Alert;
use crate::models::event::Event;
use crate::repositories::event_repo::EVENT_COLUMNS;

/// Column list for `alerts` queries.
const ALERT_COLUMNS: &str = "id, timestamp, event_id, rule_kind, severity, title, description, \
     recommendation, is_resolved, resolved_at, resolved_by";

/// Provides read/write operations for alerts and their parent events.
pub struct AlertRepo;

impl AlertRepo {
    /// Persist one violation as an event plus its linked alert.
    ///
    /// Both rows are written in a single transaction: an aborted or
    /// failed call leaves neither behind, so an event can never exist
    /// without its alert.
    pub async fn insert_for_violation(
        pool: &PgPool,
        forklift_id: DbId,
        violation: &Violation,
    ) -> Result<(Event, Alert), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let event_query = format!(
            "INSERT INTO events (kind, severity, source, forklift_id, metadata) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {EVENT_COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&event_query)
            .bind(violation.kind.as_str())
            .bind(violation.severity.as_i16())
            .bind(format!("forklift_{forklift_id}"))
            .bind(forklift_id)
            .bind(&violation.metadata)
            .fetch_one(&mut *tx)
            .await?;

        let alert_query = format!(
            "INSERT INTO alerts (event_id, rule_kind, severity, title, description, recommendation) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ALERT_COLUMNS}"
        );
        let alert = sqlx::query_as::<_, Alert>(&alert_query)
            .bind(event.id)
            .bind(violation.kind.as_str())
            .bind(violation.severity.as_i16())
            .bind(&violation.title)
            .bind(&violation.description)
            .bind(&violation.recommendation)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((event, alert))
    }

    /// Fetch a single alert by id.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!("SELECT {ALERT_COLUMNS} FROM alerts WHERE id = $1");
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List alerts, newest first. Resolved alerts are excluded unless
    /// requested.
    pub async fn list(
        pool: &PgPool,
        include_resolved: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {ALERT_COLUMNS} FROM alerts \
             WHERE ($1 OR is_resolved = FALSE) \
             ORDER BY timestamp DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(include_resolved)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Perform the open-to-resolved transition.
    ///
    /// The guard on `is_resolved` makes the transition one-way and
    /// race-free: only the first caller gets the updated row back;
    /// `None` means the alert is unknown or already resolved.
    pub async fn resolve(
        pool: &PgPool,
        id: DbId,
        resolved_by: DbId,
    ) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE alerts \
             SET is_resolved = TRUE, resolved_at = now(), resolved_by = $2 \
             WHERE id = $1 AND is_resolved = FALSE \
             RETURNING {ALERT_COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .bind(resolved_by)
            .fetch_optional(pool)
            .await
    }
}
