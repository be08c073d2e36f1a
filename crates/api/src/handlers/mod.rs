pub mod admin;
pub mod auth;
pub mod products;
pub mod users;
