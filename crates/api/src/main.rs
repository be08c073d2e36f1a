use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_api::audit::{AuditRecorder, PgAuditSink, TracingAuditSink};
use catalog_api::cache::{CacheLayer, CacheStore, MemoryCacheStore, RedisCacheStore};
use catalog_api::config::ServerConfig;
use catalog_api::router::build_app_router;
use catalog_api::routes::API_PREFIX;
use catalog_api::state::AppState;
use catalog_db::memory::MemoryStore;
use catalog_db::pg::PgStore;
use catalog_db::store::{ProductStore, UserStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        environment = ?config.environment,
        "Loaded server configuration"
    );

    // --- Store ---
    let (pool, users, products): (_, Arc<dyn UserStore>, Arc<dyn ProductStore>) =
        match &config.database_url {
            Some(database_url) => {
                let pool = catalog_db::create_pool(database_url)
                    .await
                    .expect("Failed to connect to database");
                tracing::info!("Database connection pool created");

                catalog_db::health_check(&pool)
                    .await
                    .expect("Database health check failed");
                tracing::info!("Database health check passed");

                catalog_db::run_migrations(&pool)
                    .await
                    .expect("Failed to run database migrations");
                tracing::info!("Database migrations applied");

                let store = Arc::new(PgStore::new(pool.clone()));
                let users: Arc<dyn UserStore> = store.clone();
                let products: Arc<dyn ProductStore> = store;
                (Some(pool), users, products)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using the in-memory store (data is lost on restart)");
                let store = Arc::new(MemoryStore::new());
                let users: Arc<dyn UserStore> = store.clone();
                let products: Arc<dyn ProductStore> = store;
                (None, users, products)
            }
        };

    // --- Cache ---
    let cache_store: Arc<dyn CacheStore> = match &config.redis_url {
        Some(redis_url) => {
            tracing::info!("Using Redis product cache");
            Arc::new(RedisCacheStore::from_url(redis_url).expect("Invalid REDIS_URL"))
        }
        None => {
            tracing::info!("Using in-process product cache");
            Arc::new(MemoryCacheStore::new())
        }
    };
    let cache = CacheLayer::new(cache_store, config.cache);

    // --- Audit ---
    let mut audit = AuditRecorder::new(format!("{API_PREFIX}/auth"))
        .with_write_budget(config.audit_write_budget)
        .with_sink(Arc::new(TracingAuditSink));
    if let Some(pool) = &pool {
        audit = audit.with_sink(Arc::new(PgAuditSink::new(pool.clone())));
    }
    tracing::info!(sinks = audit.sink_count(), "Audit recorder configured");

    // --- App state + router ---
    let state = AppState::new(config.clone(), pool, users, products, cache, audit);
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "catalog_api=debug,tower_http=debug,audit=info".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
