//! Audit categorisation (shared by the recorder and its sinks).
//!
//! Every request that resolved an identity produces one event. The category
//! depends on the request path and the identity's role; the outcome on the
//! response status.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Actor role category attached to an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditCategory {
    Auth,
    Admin,
    User,
}

impl AuditCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditCategory::Auth => "auth",
            AuditCategory::Admin => "admin",
            AuditCategory::User => "user",
        }
    }
}

impl fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the audited request succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// Any status below 400 counts as success.
    pub fn from_status(status: u16) -> Self {
        if status < 400 {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }
}

/// Categorise a request.
///
/// Paths under `auth_prefix` are `auth` regardless of role; otherwise admins
/// are `admin` and everyone else is `user`.
pub fn categorize(path: &str, auth_prefix: &str, role: Role) -> AuditCategory {
    if is_under(path, auth_prefix) {
        AuditCategory::Auth
    } else if role.is_admin() {
        AuditCategory::Admin
    } else {
        AuditCategory::User
    }
}

fn is_under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTH: &str = "/api/v1/auth";

    #[test]
    fn auth_paths_are_auth_for_any_role() {
        assert_eq!(categorize("/api/v1/auth/logout", AUTH, Role::User), AuditCategory::Auth);
        assert_eq!(categorize("/api/v1/auth/login", AUTH, Role::Admin), AuditCategory::Auth);
    }

    #[test]
    fn admin_role_outside_auth_is_admin() {
        assert_eq!(categorize("/api/v1/products", AUTH, Role::Admin), AuditCategory::Admin);
    }

    #[test]
    fn user_role_outside_auth_is_user() {
        assert_eq!(categorize("/api/v1/users/me", AUTH, Role::User), AuditCategory::User);
    }

    #[test]
    fn prefix_must_end_on_segment_boundary() {
        assert_eq!(
            categorize("/api/v1/authors", AUTH, Role::User),
            AuditCategory::User
        );
    }

    #[test]
    fn outcome_boundary_is_400() {
        assert_eq!(Outcome::from_status(200), Outcome::Success);
        assert_eq!(Outcome::from_status(399), Outcome::Success);
        assert_eq!(Outcome::from_status(400), Outcome::Failure);
        assert_eq!(Outcome::from_status(500), Outcome::Failure);
    }
}
