use std::time::Duration;

use crate::audit::DEFAULT_WRITE_BUDGET;
use crate::auth::jwt::JwtConfig;
use crate::cache::CacheTtls;

/// Deployment mode, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Internal error detail is returned to clients.
    Development,
    /// Internal error detail is only logged.
    #[default]
    Production,
}

impl Environment {
    /// `development` or `dev` (any case) selects development; anything else,
    /// including unset, is production.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Self::Development,
            _ => Self::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Deployment mode (default: production).
    pub environment: Environment,
    /// Longest a request waits on its audit writes (default: 250 ms).
    pub audit_write_budget: Duration,
    /// JWT secret and session lifetime.
    pub jwt: JwtConfig,
    /// Product cache TTLs.
    pub cache: CacheTtls,
    /// Redis connection string. `None` selects the in-process cache.
    pub redis_url: Option<String>,
    /// PostgreSQL connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `APP_ENV`              | `production`               |
    /// | `AUDIT_WRITE_BUDGET_MS`| `250`                      |
    /// | `CACHE_LIST_TTL_SECS`  | `60`                       |
    /// | `CACHE_ITEM_TTL_SECS`  | `300`                      |
    /// | `REDIS_URL`            | unset                      |
    /// | `DATABASE_URL`         | unset                      |
    ///
    /// See [`JwtConfig::from_env`] for the token settings.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = std::env::var("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        let audit_write_budget = match std::env::var("AUDIT_WRITE_BUDGET_MS") {
            Ok(raw) => Duration::from_millis(
                raw.parse()
                    .expect("AUDIT_WRITE_BUDGET_MS must be a valid u64"),
            ),
            Err(_) => DEFAULT_WRITE_BUDGET,
        };

        let defaults = CacheTtls::default();
        let cache = CacheTtls {
            list: secs_from_env("CACHE_LIST_TTL_SECS", defaults.list),
            item: secs_from_env("CACHE_ITEM_TTL_SECS", defaults.item),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            environment,
            audit_write_budget,
            jwt,
            cache,
            redis_url: non_empty_var("REDIS_URL"),
            database_url: non_empty_var("DATABASE_URL"),
        }
    }
}

fn secs_from_env(key: &str, default: Duration) -> Duration {
    match std::env::var(key) {
        Ok(raw) => Duration::from_secs(
            raw.parse()
                .unwrap_or_else(|_| panic!("{key} must be a valid u64")),
        ),
        Err(_) => default,
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_defaults_to_production() {
        assert_eq!(Environment::default(), Environment::Production);
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse("staging"), Environment::Production);
        assert_eq!(Environment::parse(""), Environment::Production);
    }

    #[test]
    fn environment_accepts_development_aliases() {
        assert!(Environment::parse("development").is_development());
        assert!(Environment::parse(" DEV ").is_development());
    }
}
