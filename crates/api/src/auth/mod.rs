//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- [`jwt::TokenService`]: session token issue and verification.

pub mod jwt;
pub mod password;
