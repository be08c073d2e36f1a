//! Handlers for the `/auth` resource (signup, login, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::audit::AuditIdentity;
use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::middleware::audit::IdentitySlot;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::services::{LoginInput, Session, SignupInput};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register a `user`-role identity. Returns 201 with a session token.
pub async fn signup(
    State(state): State<AppState>,
    slot: IdentitySlot,
    ValidatedJson(input): ValidatedJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Session>>)> {
    let session = state
        .auth
        .signup(SignupInput {
            name: input.name,
            email: input.email,
            password: input.password,
        })
        .await?;

    slot.fill(AuditIdentity {
        id: session.user.id,
        role: session.user.role,
    });

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            session,
            "User registered successfully",
        )),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns a session token.
pub async fn login(
    State(state): State<AppState>,
    slot: IdentitySlot,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<Session>>> {
    let session = state
        .auth
        .login(LoginInput {
            email: input.email,
            password: input.password,
        })
        .await?;

    slot.fill(AuditIdentity {
        id: session.user.id,
        role: session.user.role,
    });

    Ok(Json(ApiResponse::ok_with_message(session, "Login successful")))
}

/// POST /api/v1/auth/logout
///
/// Tokens are stateless; this only records the logout.
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<()>>> {
    state.auth.logout(&user.actor());
    Ok(Json(ApiResponse::message("Logged out successfully")))
}
