//! Business operations behind the HTTP handlers.
//!
//! Services own the store handles and the cache; handlers only translate
//! between HTTP and these calls. Every service returns [`CoreError`].

pub mod auth;
pub mod products;
pub mod users;

use catalog_core::error::CoreError;
use catalog_core::roles::Role;
use catalog_core::types::DbId;
use catalog_db::StoreError;

pub use auth::{AuthService, LoginInput, Session, SignupInput};
pub use products::{NewProduct, ProductPatch, ProductService};
pub use users::UserService;

/// The authenticated caller of a service operation, with its live role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: DbId,
    pub role: Role,
}

impl Actor {
    pub fn require_admin(&self) -> Result<(), CoreError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(CoreError::Forbidden("Admin access required".into()))
        }
    }
}

/// Map a store failure onto the domain taxonomy.
pub(crate) fn store_failure(err: StoreError) -> CoreError {
    match err {
        StoreError::Duplicate(constraint) => CoreError::Conflict(format!(
            "Duplicate value violates unique constraint: {constraint}"
        )),
        StoreError::Database(e) => CoreError::Internal(format!("Database error: {e}")),
    }
}
