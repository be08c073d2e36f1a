//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::Json;
use catalog_db::models::user::UserResponse;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let profile = state.auth.get_profile(&user.actor()).await?;
    Ok(Json(ApiResponse::ok(profile)))
}
