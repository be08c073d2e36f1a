//! Read-through / write-invalidate product cache.
//!
//! Two key families: the whole product list and one entry per product. Values
//! are JSON snapshots. The layer fails open: when the backing store errors,
//! reads fall through to the loader without caching and invalidation errors
//! are logged, never surfaced.
//!
//! Concurrent cold misses may both run the loader.

pub mod backend;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use catalog_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use backend::{CacheError, CacheStore, MemoryCacheStore, RedisCacheStore};

/// Default TTL for the product list (volatile: any create/delete changes it).
pub const DEFAULT_LIST_TTL: Duration = Duration::from_secs(60);
/// Default TTL for a single product.
pub const DEFAULT_ITEM_TTL: Duration = Duration::from_secs(300);

/// Cache key for product data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The full product collection.
    ProductList,
    /// One product by id.
    Product(DbId),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::ProductList => f.write_str("products:list"),
            CacheKey::Product(id) => write!(f, "product:{id}"),
        }
    }
}

/// TTLs per key family.
#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    pub list: Duration,
    pub item: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            list: DEFAULT_LIST_TTL,
            item: DEFAULT_ITEM_TTL,
        }
    }
}

/// Typed cache facade over a [`CacheStore`].
#[derive(Clone)]
pub struct CacheLayer {
    store: Arc<dyn CacheStore>,
    ttls: CacheTtls,
}

impl CacheLayer {
    pub fn new(store: Arc<dyn CacheStore>, ttls: CacheTtls) -> Self {
        Self { store, ttls }
    }

    /// TTL applied to entries under `key`.
    pub fn ttl_for(&self, key: CacheKey) -> Duration {
        match key {
            CacheKey::ProductList => self.ttls.list,
            CacheKey::Product(_) => self.ttls.item,
        }
    }

    /// Return the cached value for `key`, or run `loader`, cache its result
    /// and return it. Loader errors are returned as-is and nothing is cached.
    pub async fn get_or_load<T, E, F, Fut>(&self, key: CacheKey, loader: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cache_key = key.to_string();

        let cache_reachable = match self.store.get(&cache_key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => {
                    tracing::debug!(key = %cache_key, "cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(key = %cache_key, error = %e, "Discarding undecodable cache entry");
                    true
                }
            },
            Ok(None) => {
                tracing::debug!(key = %cache_key, "cache miss");
                true
            }
            Err(e) => {
                tracing::warn!(key = %cache_key, error = %e, "Cache read failed, loading from store");
                false
            }
        };

        let value = loader().await?;

        if cache_reachable {
            match serde_json::to_vec(&value) {
                Ok(bytes) => {
                    if let Err(e) = self.store.set(&cache_key, bytes, self.ttl_for(key)).await {
                        tracing::warn!(key = %cache_key, error = %e, "Cache write failed");
                    }
                }
                Err(e) => {
                    tracing::warn!(key = %cache_key, error = %e, "Failed to serialize cache entry");
                }
            }
        }

        Ok(value)
    }

    /// Remove `key`. Completes before returning; failures are logged only.
    pub async fn invalidate(&self, key: CacheKey) {
        let cache_key = key.to_string();
        match self.store.delete(&cache_key).await {
            Ok(()) => tracing::debug!(key = %cache_key, "cache invalidated"),
            Err(e) => {
                tracing::warn!(key = %cache_key, error = %e, "Cache invalidation failed")
            }
        }
    }

    /// Invalidate the list and then the entry for product `id`.
    pub async fn invalidate_product(&self, id: DbId) {
        self.invalidate(CacheKey::ProductList).await;
        self.invalidate(CacheKey::Product(id)).await;
    }
}
