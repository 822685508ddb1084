//! Repository for the `events` table.

use liftguard_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::Event;

/// Column list for `events` queries.
pub(crate) const EVENT_COLUMNS: &str =
    "id, timestamp, kind, severity, source, forklift_id, metadata";

/// Optional filters for event listings. Unset fields do not constrain
/// the query.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub severity: Option<i16>,
    pub kind: Option<String>,
    pub forklift_id: Option<DbId>,
}

/// Provides read operations for safety events.
///
/// Rule-derived events are written by
/// [`AlertRepo::insert_for_violation`](crate::repositories::AlertRepo::insert_for_violation)
/// together with their alert.
pub struct EventRepo;

impl EventRepo {
    /// Fetch a single event by id.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List events matching the filter, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &EventFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE ($1::smallint IS NULL OR severity = $1) \
               AND ($2::varchar IS NULL OR kind = $2) \
               AND ($3::bigint IS NULL OR forklift_id = $3) \
             ORDER BY timestamp DESC LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(filter.severity)
            .bind(filter.kind.as_deref())
            .bind(filter.forklift_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List high-severity events (severity 4 and above), newest first.
    pub async fn list_critical(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE severity >= 4 \
             ORDER BY timestamp DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
