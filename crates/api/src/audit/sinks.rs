//! Audit sink implementations.

use async_trait::async_trait;
use catalog_db::models::audit::CreateAuditLog;
use catalog_db::repositories::AuditLogRepo;
use catalog_db::DbPool;

use super::{AuditError, AuditEvent, AuditSink};

/// Emits each event as a structured log line on the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        tracing::info!(
            target: "audit",
            actor_id = ?event.actor_id,
            category = %event.category,
            action = %event.action,
            outcome = event.outcome.as_str(),
            status_code = event.details.status_code,
            response_time_ms = event.details.response_time_ms,
            user_agent = ?event.details.user_agent,
            ip = ?event.details.ip,
            "audit"
        );
        Ok(())
    }
}

/// Appends each event to the `audit_logs` table.
#[derive(Clone)]
pub struct PgAuditSink {
    pool: DbPool,
}

impl PgAuditSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PgAuditSink {
    async fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let entry = CreateAuditLog {
            actor_id: event.actor_id,
            category: event.category.as_str().to_string(),
            action: event.action.clone(),
            outcome: event.outcome.as_str().to_string(),
            details: serde_json::to_value(&event.details)?,
            occurred_at: event.timestamp,
        };
        AuditLogRepo::insert(&self.pool, &entry).await?;
        Ok(())
    }
}
