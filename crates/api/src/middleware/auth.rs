//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use catalog_core::error::CoreError;
use catalog_core::roles::Role;
use catalog_core::types::DbId;

use super::audit::IdentitySlot;
use crate::audit::AuditIdentity;
use crate::error::AppError;
use crate::services::{store_failure, Actor};
use crate::state::AppState;

/// Authenticated user resolved from a JWT Bearer token in the `Authorization` header.
///
/// The role is the one currently stored for the identity, not the one embedded
/// in the token, so a demotion takes effect on the next request.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: DbId,
    pub role: Role,
    pub email: String,
    pub name: String,
}

impl AuthUser {
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: self.role,
        }
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by an earlier extractor on this request.
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| unauthorized("Missing token"))?;

        let verified = state
            .tokens
            .verify(token)
            .map_err(|_| unauthorized("Unauthorized"))?;

        let user = state
            .users
            .find_user(verified.subject_id)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| {
                tracing::debug!(user_id = verified.subject_id, "Token subject no longer exists");
                unauthorized("Unauthorized")
            })?;

        let auth_user = AuthUser {
            id: user.id,
            role: user.role,
            email: user.email,
            name: user.name,
        };

        if let Some(slot) = parts.extensions.get::<IdentitySlot>() {
            slot.fill(AuditIdentity {
                id: auth_user.id,
                role: auth_user.role,
            });
        }
        parts.extensions.insert(auth_user.clone());

        Ok(auth_user)
    }
}
