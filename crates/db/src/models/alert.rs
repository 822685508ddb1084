//! Alert entity model.

use liftguard_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `alerts` table.
///
/// Every alert wraps exactly one event (`event_id` is unique). The
/// resolution fields are written once, on the open-to-resolved
/// transition, and never change afterwards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Alert {
    pub id: DbId,
    pub timestamp: Timestamp,
    pub event_id: DbId,
    pub rule_kind: String,
    pub severity: i16,
    pub title: String,
    pub description: String,
    pub recommendation: Option<String>,
    pub is_resolved: bool,
    pub resolved_at: Option<Timestamp>,
    pub resolved_by: Option<DbId>,
}
