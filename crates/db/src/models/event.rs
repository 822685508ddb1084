//! Safety event entity model.

use liftguard_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `events` table.
///
/// `kind` holds the storage name of a
/// [`RuleKind`](liftguard_core::safety::RuleKind) for rule-derived
/// events.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub timestamp: Timestamp,
    pub kind: String,
    pub severity: i16,
    pub source: String,
    pub forklift_id: Option<DbId>,
    pub metadata: Option<serde_json::Value>,
}
