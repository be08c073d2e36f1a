//! Catalog API server library.
//!
//! Exposes the building blocks (config, state, services, cache, audit,
//! error handling, routes) so integration tests and the binary entrypoints
//! can both access them.

pub mod audit;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
