//! Repository for the append-only `audit_logs` table.

use sqlx::PgPool;

use crate::models::audit::{AuditLog, CreateAuditLog};

const COLUMNS: &str = "id, actor_id, category, action, outcome, details, occurred_at";

/// Insert-only access to audit logs.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append one audit event.
    pub async fn insert(pool: &PgPool, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs (actor_id, category, action, outcome, details, occurred_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entry.actor_id)
            .bind(&entry.category)
            .bind(&entry.action)
            .bind(&entry.outcome)
            .bind(&entry.details)
            .bind(entry.occurred_at)
            .fetch_one(pool)
            .await
    }
}
