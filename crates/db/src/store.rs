//! Store traits injected into the API services.
//!
//! Both traits are object-safe so handlers share one `Arc<dyn ...>` per store.
//! Method names are distinct so a single backend can implement both.

use async_trait::async_trait;
use catalog_core::roles::Role;
use catalog_core::types::DbId;

use crate::error::StoreError;
use crate::models::product::{CreateProduct, Product, UpdateProduct};
use crate::models::user::{CreateUser, User};

/// Key-by-id store for identities, with a case-insensitive email index.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert an identity. Fails with [`StoreError::Duplicate`] if the email is taken.
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError>;

    async fn find_user(&self, id: DbId) -> Result<Option<User>, StoreError>;

    /// Case-insensitive email lookup.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// All identities, newest first.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn update_user_role(&self, id: DbId, role: Role) -> Result<Option<User>, StoreError>;
}

/// Key-by-id store for products. Reads populate `createdBy`.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products in insertion order.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn find_product(&self, id: DbId) -> Result<Option<Product>, StoreError>;

    async fn create_product(&self, input: &CreateProduct) -> Result<Product, StoreError>;

    /// Partial update; `None` if the product does not exist.
    async fn update_product(
        &self,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, StoreError>;

    /// Returns `true` if a product was removed.
    async fn delete_product(&self, id: DbId) -> Result<bool, StoreError>;
}
