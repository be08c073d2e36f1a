//! Handlers for the `/admin` resource. All require the `admin` role.

use axum::extract::State;
use axum::Json;
use catalog_core::roles::Role;
use catalog_db::models::user::UserResponse;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::extract::{IdPath, ValidatedJson};
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for `PATCH /admin/users/{id}/role`.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = state.admin.list(&admin.actor()).await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// PATCH /api/v1/admin/users/{id}/role
///
/// An admin cannot change their own role (403).
pub async fn change_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<ChangeRoleRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.admin.change_role(&admin.actor(), id, input.role).await?;
    Ok(Json(ApiResponse::ok_with_message(
        user,
        "User role updated successfully",
    )))
}
