//! Request auditing.
//!
//! [`AuditRecorder`] turns a finished request ([`RequestObservation`]) into at
//! most one [`AuditEvent`] and hands it to every configured [`AuditSink`].
//! Requests that never resolved an identity produce nothing. Sink failures
//! are logged and dropped; they never affect the response.
//!
//! [`AuditRecorder::dispatch`] is what the request path calls: the sink
//! writes run on their own task and the caller waits at most the write
//! budget for them. A slower write keeps running after the response leaves.

pub mod sinks;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use catalog_core::audit::{categorize, AuditCategory, Outcome};
use catalog_core::roles::Role;
use catalog_core::types::{DbId, Timestamp};
use chrono::Utc;
use serde::Serialize;

pub use sinks::{PgAuditSink, TracingAuditSink};

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Failed to persist audit event: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to encode audit details: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The identity a request resolved to, as seen by the auditor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditIdentity {
    pub id: DbId,
    pub role: Role,
}

/// Everything observed about one completed request.
#[derive(Debug, Clone)]
pub struct RequestObservation {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub duration: Duration,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub identity: Option<AuditIdentity>,
}

/// Free-form event details, serialized as a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDetails {
    pub path: String,
    pub method: String,
    pub status_code: u16,
    pub response_time_ms: u64,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

/// One append-only audit record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub actor_id: Option<DbId>,
    pub category: AuditCategory,
    pub action: String,
    pub outcome: Outcome,
    pub details: AuditDetails,
    pub timestamp: Timestamp,
}

/// Destination for audit events.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, event: &AuditEvent) -> Result<(), AuditError>;
}

/// How long a request waits for its audit writes by default.
pub const DEFAULT_WRITE_BUDGET: Duration = Duration::from_millis(250);

/// Builds audit events and fans them out to sinks.
#[derive(Clone)]
pub struct AuditRecorder {
    sinks: Vec<Arc<dyn AuditSink>>,
    auth_prefix: String,
    write_budget: Duration,
}

impl AuditRecorder {
    /// `auth_prefix` is the path prefix whose requests are categorised as `auth`.
    pub fn new(auth_prefix: impl Into<String>) -> Self {
        Self {
            sinks: Vec::new(),
            auth_prefix: auth_prefix.into(),
            write_budget: DEFAULT_WRITE_BUDGET,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn with_write_budget(mut self, budget: Duration) -> Self {
        self.write_budget = budget;
        self
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Build the event for `observation`, or `None` when no identity resolved.
    pub fn build_event(&self, observation: &RequestObservation) -> Option<AuditEvent> {
        let identity = observation.identity?;

        Some(AuditEvent {
            actor_id: Some(identity.id),
            category: categorize(&observation.path, &self.auth_prefix, identity.role),
            action: format!("{} {}", observation.method, observation.path),
            outcome: Outcome::from_status(observation.status),
            details: AuditDetails {
                path: observation.path.clone(),
                method: observation.method.clone(),
                status_code: observation.status,
                response_time_ms: observation.duration.as_millis() as u64,
                user_agent: observation.user_agent.clone(),
                ip: observation.ip.clone(),
            },
            timestamp: Utc::now(),
        })
    }

    /// Record `observation` in every sink. Never fails.
    pub async fn observe(&self, observation: &RequestObservation) {
        let Some(event) = self.build_event(observation) else {
            return;
        };

        for sink in &self.sinks {
            if let Err(e) = sink.record(&event).await {
                tracing::error!(
                    error = %e,
                    action = %event.action,
                    "Failed to record audit event"
                );
            }
        }
    }

    /// Record `observation` on a detached task, waiting at most the write
    /// budget. Cancelling the caller does not cancel the writes.
    pub async fn dispatch(&self, observation: RequestObservation) {
        if observation.identity.is_none() || self.sinks.is_empty() {
            return;
        }

        let recorder = self.clone();
        let action = format!("{} {}", observation.method, observation.path);
        let writes = tokio::spawn(async move { recorder.observe(&observation).await });

        match tokio::time::timeout(self.write_budget, writes).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!(error = %e, %action, "Audit write task failed");
            }
            Err(_) => {
                tracing::warn!(
                    %action,
                    budget_ms = self.write_budget.as_millis() as u64,
                    "Audit write exceeded its budget, finishing in background"
                );
            }
        }
    }
}
