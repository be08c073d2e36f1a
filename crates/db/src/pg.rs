//! PostgreSQL-backed store.

use async_trait::async_trait;
use catalog_core::roles::Role;
use catalog_core::types::DbId;

use crate::error::StoreError;
use crate::models::product::{CreateProduct, Product, UpdateProduct};
use crate::models::user::{CreateUser, User};
use crate::repositories::{ProductRepo, UserRepo};
use crate::store::{ProductStore, UserStore};
use crate::DbPool;

/// Implements the store traits on top of the repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(UserRepo::list(&self.pool).await?)
    }

    async fn update_user_role(&self, id: DbId, role: Role) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::update_role(&self.pool, id, role).await?)
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = ProductRepo::list(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_product(&self, id: DbId) -> Result<Option<Product>, StoreError> {
        let row = ProductRepo::find_by_id(&self.pool, id).await?;
        Ok(row.map(Product::from))
    }

    async fn create_product(&self, input: &CreateProduct) -> Result<Product, StoreError> {
        let row = ProductRepo::create(&self.pool, input).await?;
        Ok(Product::from(row))
    }

    async fn update_product(
        &self,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, StoreError> {
        let row = ProductRepo::update(&self.pool, id, input).await?;
        Ok(row.map(Product::from))
    }

    async fn delete_product(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(ProductRepo::delete(&self.pool, id).await?)
    }
}
