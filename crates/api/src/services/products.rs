//! Product CRUD composed with the read-through cache.
//!
//! Reads go through [`CacheLayer::get_or_load`]; every successful write
//! invalidates the list key and, for existing products, the item key before
//! returning. A write and its invalidation run together on a detached task,
//! so dropping the request cannot leave a committed write behind a stale key.

use std::future::Future;
use std::sync::Arc;

use catalog_core::error::{CoreError, FieldError};
use catalog_core::product::{check_description, check_name, check_price};
use catalog_core::types::DbId;
use catalog_db::models::product::{CreateProduct, Product, UpdateProduct};
use catalog_db::store::ProductStore;
use rust_decimal::Decimal;

use super::{store_failure, Actor};
use crate::cache::{CacheKey, CacheLayer};

/// Input for [`ProductService::create`].
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

/// Input for [`ProductService::update`]. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
    cache: CacheLayer,
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Product",
        id,
    }
}

/// Run a field check, collecting its failure instead of returning early.
fn collect_field<T>(result: Result<T, FieldError>, errors: &mut Vec<FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

/// Run `write` to completion on its own task and wait for its result.
async fn detached<T, F>(write: F) -> Result<T, CoreError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, CoreError>> + Send + 'static,
{
    tokio::spawn(write)
        .await
        .map_err(|e| CoreError::Internal(format!("Product write task failed: {e}")))?
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>, cache: CacheLayer) -> Self {
        Self { store, cache }
    }

    /// All products, served from the list key when warm.
    pub async fn list(&self, _actor: &Actor) -> Result<Vec<Product>, CoreError> {
        let store = &self.store;
        self.cache
            .get_or_load(CacheKey::ProductList, || async move {
                store.list_products().await.map_err(store_failure)
            })
            .await
    }

    /// One product, served from its item key when warm. Misses are not cached.
    pub async fn get(&self, _actor: &Actor, id: DbId) -> Result<Product, CoreError> {
        let store = &self.store;
        self.cache
            .get_or_load(CacheKey::Product(id), || async move {
                store
                    .find_product(id)
                    .await
                    .map_err(store_failure)?
                    .ok_or_else(|| not_found(id))
            })
            .await
    }

    pub async fn create(&self, actor: &Actor, input: NewProduct) -> Result<Product, CoreError> {
        actor.require_admin()?;

        let mut errors = Vec::new();
        let name = collect_field(check_name(&input.name), &mut errors);
        let description = collect_field(
            check_description(input.description.as_deref().unwrap_or_default()),
            &mut errors,
        );
        let price = collect_field(check_price(input.price), &mut errors);

        let (Some(name), Some(description), Some(price)) = (name, description, price) else {
            return Err(CoreError::Validation(errors));
        };

        let input = CreateProduct {
            name,
            description,
            price,
            created_by: actor.id,
        };
        let (store, cache) = (Arc::clone(&self.store), self.cache.clone());
        let product = detached(async move {
            let product = store.create_product(&input).await.map_err(store_failure)?;
            cache.invalidate(CacheKey::ProductList).await;
            cache.invalidate(CacheKey::Product(product.id)).await;
            Ok::<_, CoreError>(product)
        })
        .await?;

        tracing::info!(product_id = product.id, actor_id = actor.id, "Product created");
        Ok(product)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: DbId,
        patch: ProductPatch,
    ) -> Result<Product, CoreError> {
        actor.require_admin()?;

        let mut errors = Vec::new();
        let changes = UpdateProduct {
            name: patch
                .name
                .as_deref()
                .and_then(|n| collect_field(check_name(n), &mut errors)),
            description: patch
                .description
                .as_deref()
                .and_then(|d| collect_field(check_description(d), &mut errors)),
            price: patch
                .price
                .and_then(|p| collect_field(check_price(p), &mut errors)),
        };
        if !errors.is_empty() {
            return Err(CoreError::Validation(errors));
        }

        let (store, cache) = (Arc::clone(&self.store), self.cache.clone());
        let product = detached(async move {
            let product = store
                .update_product(id, &changes)
                .await
                .map_err(store_failure)?
                .ok_or_else(|| not_found(id))?;
            cache.invalidate_product(id).await;
            Ok::<_, CoreError>(product)
        })
        .await?;

        tracing::info!(product_id = id, actor_id = actor.id, "Product updated");
        Ok(product)
    }

    pub async fn delete(&self, actor: &Actor, id: DbId) -> Result<(), CoreError> {
        actor.require_admin()?;

        let (store, cache) = (Arc::clone(&self.store), self.cache.clone());
        detached(async move {
            if !store.delete_product(id).await.map_err(store_failure)? {
                return Err(not_found(id));
            }
            cache.invalidate_product(id).await;
            Ok::<_, CoreError>(())
        })
        .await?;

        tracing::info!(product_id = id, actor_id = actor.id, "Product deleted");
        Ok(())
    }
}
