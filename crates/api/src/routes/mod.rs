pub mod admin;
pub mod auth;
pub mod health;
pub mod products;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Path prefix every API route is nested under.
pub const API_PREFIX: &str = "/api/v1";

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                     signup (public)
/// /auth/login                      login (public)
/// /auth/logout                     logout (requires auth)
///
/// /users/me                        current identity (requires auth)
///
/// /products                        list (auth), create (admin)
/// /products/{id}                   get (auth), update, delete (admin)
///
/// /admin/users                     list identities (admin)
/// /admin/users/{id}/role           change role (admin, not self)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/products", products::router())
        .nest("/admin", admin::router())
}
