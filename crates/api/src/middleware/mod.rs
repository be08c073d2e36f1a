//! Authentication, authorization and audit middleware.
//!
//! - [`auth::AuthUser`] -- Resolves the Bearer token to the live identity.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`audit::audit_requests`] -- Emits one audit event per request.
//! - [`errors::reveal_internal_errors`] -- Exposes 500 causes in development.

pub mod audit;
pub mod auth;
pub mod errors;
pub mod rbac;
