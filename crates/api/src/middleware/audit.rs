//! Per-request audit middleware.
//!
//! [`audit_requests`] installs an empty [`IdentitySlot`] in the request
//! extensions, runs the rest of the stack, then reports the status, timing
//! and whatever identity the slot ended up holding to the
//! [`AuditRecorder`](crate::audit::AuditRecorder).
//!
//! The client address comes from [`ConnectInfo`], which is present when the
//! server is started with `into_make_service_with_connect_info`.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use axum::extract::{ConnectInfo, FromRequestParts, Request, State};
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::audit::{AuditIdentity, RequestObservation};
use crate::state::AppState;

/// Write-once holder for the identity a request resolved to.
///
/// Shared between the audit middleware and whichever extractor or handler
/// authenticates the caller. The first fill wins.
#[derive(Debug, Clone, Default)]
pub struct IdentitySlot(Arc<OnceLock<AuditIdentity>>);

impl IdentitySlot {
    pub fn fill(&self, identity: AuditIdentity) {
        let _ = self.0.set(identity);
    }

    pub fn get(&self) -> Option<AuditIdentity> {
        self.0.get().copied()
    }
}

/// Yields the request's slot, or a detached one when auditing is not installed.
impl<S: Send + Sync> FromRequestParts<S> for IdentitySlot {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<IdentitySlot>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Middleware: audit every request that resolves an identity.
///
/// Sink writes get at most the recorder's write budget before the response
/// is returned; see [`AuditRecorder::dispatch`](crate::audit::AuditRecorder::dispatch).
pub async fn audit_requests(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    let slot = IdentitySlot::default();
    request.extensions_mut().insert(slot.clone());

    let response = next.run(request).await;

    let observation = RequestObservation {
        method,
        path,
        status: response.status().as_u16(),
        duration: started.elapsed(),
        user_agent,
        ip,
        identity: slot.get(),
    };
    state.audit.dispatch(observation).await;

    response
}
