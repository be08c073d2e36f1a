#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use catalog_api::audit::{AuditError, AuditEvent, AuditRecorder, AuditSink};
use catalog_api::auth::jwt::{JwtConfig, TokenService};
use catalog_api::auth::password::hash_password;
use catalog_api::cache::{CacheLayer, CacheTtls, MemoryCacheStore};
use catalog_api::audit::DEFAULT_WRITE_BUDGET;
use catalog_api::config::{Environment, ServerConfig};
use catalog_api::router::build_app_router;
use catalog_api::state::AppState;
use catalog_core::roles::Role;
use catalog_core::types::DbId;
use catalog_db::memory::MemoryStore;
use catalog_db::models::product::{CreateProduct, Product, UpdateProduct};
use catalog_db::models::user::{CreateUser, User};
use catalog_db::store::{ProductStore, UserStore};
use catalog_db::StoreError;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        environment: Environment::Production,
        audit_write_budget: DEFAULT_WRITE_BUDGET,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            expiry_mins: 60,
        },
        cache: CacheTtls::default(),
        redis_url: None,
        database_url: None,
    }
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Records every audit event in memory, optionally after a delay.
#[derive(Default)]
pub struct CapturingSink {
    events: Mutex<Vec<AuditEvent>>,
    delay: Option<Duration>,
}

impl CapturingSink {
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for CapturingSink {
    async fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Product store that counts reads reaching it, to observe cache hits.
/// List reads can be slowed down or made to panic.
pub struct CountingProductStore {
    inner: Arc<MemoryStore>,
    list_reads: AtomicUsize,
    item_reads: AtomicUsize,
    list_delay: Option<Duration>,
    panic_on_list: bool,
}

impl CountingProductStore {
    pub fn list_reads(&self) -> usize {
        self.list_reads.load(Ordering::SeqCst)
    }

    pub fn item_reads(&self) -> usize {
        self.item_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductStore for CountingProductStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.list_reads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        if self.panic_on_list {
            panic!("product table exploded");
        }
        self.inner.list_products().await
    }

    async fn find_product(&self, id: DbId) -> Result<Option<Product>, StoreError> {
        self.item_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_product(id).await
    }

    async fn create_product(&self, input: &CreateProduct) -> Result<Product, StoreError> {
        self.inner.create_product(input).await
    }

    async fn update_product(
        &self,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, StoreError> {
        self.inner.update_product(id, input).await
    }

    async fn delete_product(&self, id: DbId) -> Result<bool, StoreError> {
        self.inner.delete_product(id).await
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The full router plus handles on its in-memory backends.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub products: Arc<CountingProductStore>,
    pub cache: MemoryCacheStore,
    pub audit: Arc<CapturingSink>,
    pub tokens: TokenService,
}

/// Knobs for [`build_test_app_with`]. The default is a well-behaved app.
#[derive(Debug, Clone, Default)]
pub struct TestOptions {
    pub environment: Environment,
    pub audit_delay: Option<Duration>,
    pub audit_write_budget: Option<Duration>,
    pub list_delay: Option<Duration>,
    pub panic_on_list: bool,
}

/// Build the full application router with all middleware layers, backed by
/// the in-memory store and cache and a capturing audit sink.
pub fn build_test_app() -> TestApp {
    build_test_app_with(TestOptions::default())
}

pub fn build_test_app_with(options: TestOptions) -> TestApp {
    let mut config = test_config();
    config.environment = options.environment;
    if let Some(budget) = options.audit_write_budget {
        config.audit_write_budget = budget;
    }

    let store = Arc::new(MemoryStore::new());
    let products = Arc::new(CountingProductStore {
        inner: Arc::clone(&store),
        list_reads: AtomicUsize::new(0),
        item_reads: AtomicUsize::new(0),
        list_delay: options.list_delay,
        panic_on_list: options.panic_on_list,
    });
    let cache = MemoryCacheStore::new();
    let audit = Arc::new(CapturingSink {
        events: Mutex::default(),
        delay: options.audit_delay,
    });

    let state = AppState::new(
        config.clone(),
        None,
        store.clone(),
        products.clone(),
        CacheLayer::new(Arc::new(cache.clone()), config.cache),
        AuditRecorder::new("/api/v1/auth")
            .with_write_budget(config.audit_write_budget)
            .with_sink(audit.clone()),
    );

    TestApp {
        router: build_app_router(state, &config),
        tokens: TokenService::new(&config.jwt),
        store,
        products,
        cache,
        audit,
    }
}

impl TestApp {
    /// Insert an identity directly and return it with a valid session token.
    pub async fn create_user(&self, email: &str, password: &str, role: Role) -> (User, String) {
        let user = self
            .store
            .create_user(&CreateUser {
                name: email.split('@').next().unwrap().to_string(),
                email: email.to_string(),
                password_hash: hash_password(password).expect("hashing should succeed"),
                role,
            })
            .await
            .expect("user creation should succeed");
        let token = self.tokens.issue_session(user.id, user.role).unwrap();
        (user, token)
    }

    pub async fn admin(&self) -> (User, String) {
        self.create_user("admin@example.com", "admin123", Role::Admin)
            .await
    }

    pub async fn user(&self) -> (User, String) {
        self.create_user("user@example.com", "user123", Role::User)
            .await
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_auth(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(
            Request::get(uri)
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.send(json_request("POST", uri, None, body)).await
    }

    pub async fn post_json_auth(
        &self,
        uri: &str,
        token: &str,
        body: serde_json::Value,
    ) -> Response<Body> {
        self.send(json_request("POST", uri, Some(token), body)).await
    }

    pub async fn patch_json_auth(
        &self,
        uri: &str,
        token: &str,
        body: serde_json::Value,
    ) -> Response<Body> {
        self.send(json_request("PATCH", uri, Some(token), body)).await
    }

    pub async fn delete_auth(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(
            Request::delete(uri)
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}
