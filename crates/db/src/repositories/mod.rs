//! PostgreSQL repositories. Each is a zero-sized struct of associated
//! functions taking the pool explicitly.

pub mod audit_repo;
pub mod product_repo;
pub mod user_repo;

pub use audit_repo::AuditLogRepo;
pub use product_repo::ProductRepo;
pub use user_repo::UserRepo;
