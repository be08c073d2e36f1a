//! Audit log model (append-only, no `updated_at`).

use catalog_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A persisted audit event.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub actor_id: Option<DbId>,
    pub category: String,
    pub action: String,
    pub outcome: String,
    pub details: serde_json::Value,
    pub occurred_at: Timestamp,
}

/// DTO for inserting an audit event.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub actor_id: Option<DbId>,
    pub category: String,
    pub action: String,
    pub outcome: String,
    pub details: serde_json::Value,
    pub occurred_at: Timestamp,
}
