use std::sync::Arc;

use catalog_db::store::{ProductStore, UserStore};
use catalog_db::DbPool;

use crate::audit::AuditRecorder;
use crate::auth::jwt::TokenService;
use crate::cache::CacheLayer;
use crate::config::ServerConfig;
use crate::services::{AuthService, ProductService, UserService};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Database pool, when running against PostgreSQL. Used by the health check.
    pub pool: Option<DbPool>,
    /// Session token issuer/verifier.
    pub tokens: TokenService,
    /// Identity store, read by the auth extractor for the live role.
    pub users: Arc<dyn UserStore>,
    pub auth: AuthService,
    pub products: ProductService,
    pub admin: UserService,
    pub audit: AuditRecorder,
}

impl AppState {
    /// Wire the services over the given stores and cache.
    pub fn new(
        config: ServerConfig,
        pool: Option<DbPool>,
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
        cache: CacheLayer,
        audit: AuditRecorder,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt);

        Self {
            auth: AuthService::new(Arc::clone(&users), tokens.clone()),
            products: ProductService::new(products, cache),
            admin: UserService::new(Arc::clone(&users)),
            config: Arc::new(config),
            pool,
            tokens,
            users,
            audit,
        }
    }
}
