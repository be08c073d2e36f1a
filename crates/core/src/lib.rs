//! Domain primitives shared by the store and API crates.
//!
//! Zero internal dependencies: ids and timestamps, roles, the domain error
//! taxonomy, product field rules, and audit categorisation.

pub mod audit;
pub mod error;
pub mod product;
pub mod roles;
pub mod types;
