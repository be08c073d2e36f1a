//! Admin identity management.

use std::sync::Arc;

use catalog_core::error::CoreError;
use catalog_core::roles::Role;
use catalog_core::types::DbId;
use catalog_db::models::user::UserResponse;
use catalog_db::store::UserStore;

use super::{store_failure, Actor};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Every identity, newest first, without password hashes.
    pub async fn list(&self, actor: &Actor) -> Result<Vec<UserResponse>, CoreError> {
        actor.require_admin()?;
        let users = self.users.list_users().await.map_err(store_failure)?;
        Ok(users.iter().map(UserResponse::from).collect())
    }

    /// Set the role of identity `id`. An admin can never change their own role.
    pub async fn change_role(
        &self,
        actor: &Actor,
        id: DbId,
        role: Role,
    ) -> Result<UserResponse, CoreError> {
        actor.require_admin()?;
        if actor.id == id {
            return Err(CoreError::Forbidden("Cannot modify your own role".into()));
        }

        let user = self
            .users
            .update_user_role(id, role)
            .await
            .map_err(store_failure)?
            .ok_or(CoreError::NotFound { entity: "User", id })?;

        tracing::info!(user_id = id, actor_id = actor.id, role = %role, "User role changed");
        Ok(UserResponse::from(&user))
    }
}
