//! Signup, login, profile and logout.

use std::sync::{Arc, OnceLock};

use catalog_core::error::CoreError;
use catalog_core::roles::Role;
use catalog_db::models::user::{normalize_email, CreateUser, User, UserResponse};
use catalog_db::store::UserStore;
use catalog_db::StoreError;
use serde::Serialize;

use super::{store_failure, Actor};
use crate::auth::jwt::TokenService;
use crate::auth::password::{hash_password, verify_password};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const EMAIL_TAKEN: &str = "Email already registered";

/// Input for [`AuthService::signup`].
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Input for [`AuthService::login`].
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// A freshly issued session token and the identity it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
}

/// Hash checked on the unknown-email login path so it costs one Argon2
/// verification, like the known-email path.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password("not-a-real-password").ok())
        .as_deref()
}

/// Display name used when signup omits one: the email's local part.
fn default_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Register a `user`-role identity and issue its first session token.
    pub async fn signup(&self, input: SignupInput) -> Result<Session, CoreError> {
        let email = normalize_email(&input.email);

        if self
            .users
            .find_user_by_email(&email)
            .await
            .map_err(store_failure)?
            .is_some()
        {
            tracing::warn!(email = %email, "Signup rejected: email already registered");
            return Err(CoreError::Conflict(EMAIL_TAKEN.into()));
        }

        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_name(&email));

        let password_hash = hash_password(&input.password)
            .map_err(|e| CoreError::Internal(format!("Password hashing failed: {e}")))?;

        let user = self
            .users
            .create_user(&CreateUser {
                name,
                email,
                password_hash,
                role: Role::User,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent signup for the same email.
                StoreError::Duplicate(_) => CoreError::Conflict(EMAIL_TAKEN.into()),
                other => store_failure(other),
            })?;

        tracing::info!(user_id = user.id, "User registered");
        self.session_for(&user)
    }

    /// Exchange credentials for a session token.
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(&self, input: LoginInput) -> Result<Session, CoreError> {
        let email = normalize_email(&input.email);
        let user = self
            .users
            .find_user_by_email(&email)
            .await
            .map_err(store_failure)?;

        let Some(user) = user else {
            if let Some(hash) = dummy_hash() {
                let _ = verify_password(&input.password, hash);
            }
            tracing::warn!(email = %email, "Login failed: unknown email");
            return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()));
        };

        let valid = verify_password(&input.password, &user.password_hash)
            .map_err(|e| CoreError::Internal(format!("Password verification error: {e}")))?;
        if !valid {
            tracing::warn!(user_id = user.id, "Login failed: wrong password");
            return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        tracing::info!(user_id = user.id, "User logged in");
        self.session_for(&user)
    }

    /// The caller's current identity, re-read from the store.
    pub async fn get_profile(&self, actor: &Actor) -> Result<UserResponse, CoreError> {
        let user = self
            .users
            .find_user(actor.id)
            .await
            .map_err(store_failure)?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: actor.id,
            })?;
        Ok(UserResponse::from(&user))
    }

    /// Tokens are stateless; logging out only leaves a trace in the logs.
    pub fn logout(&self, actor: &Actor) {
        tracing::info!(user_id = actor.id, "User logged out");
    }

    fn session_for(&self, user: &User) -> Result<Session, CoreError> {
        let token = self
            .tokens
            .issue_session(user.id, user.role)
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        Ok(Session {
            token,
            user: UserResponse::from(user),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use catalog_db::memory::MemoryStore;

    use super::*;
    use crate::auth::jwt::JwtConfig;

    fn service() -> AuthService {
        let tokens = TokenService::new(&JwtConfig {
            secret: "auth-service-test-secret".into(),
            expiry_mins: 60,
        });
        AuthService::new(Arc::new(MemoryStore::new()), tokens)
    }

    fn signup(email: &str, password: &str) -> SignupInput {
        SignupInput {
            name: None,
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn signup_normalizes_email_and_defaults_name() {
        let auth = service();
        let session = auth.signup(signup(" Jane@Example.COM ", "secret1")).await.unwrap();
        assert_eq!(session.user.email, "jane@example.com");
        assert_eq!(session.user.name, "jane");
        assert_eq!(session.user.role, Role::User);
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn duplicate_signup_conflicts_regardless_of_case() {
        let auth = service();
        auth.signup(signup("a@x.com", "secret1")).await.unwrap();
        let err = auth.signup(signup("A@X.com", "other12")).await.unwrap_err();
        assert_matches!(err, CoreError::Conflict(msg) if msg == EMAIL_TAKEN);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let auth = service();
        auth.signup(signup("a@x.com", "secret1")).await.unwrap();

        let wrong_password = auth
            .login(LoginInput {
                email: "a@x.com".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();
        let unknown_email = auth
            .login(LoginInput {
                email: "ghost@x.com".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_matches!(wrong_password, CoreError::Unauthorized(_));
    }

    #[tokio::test]
    async fn login_succeeds_with_any_email_case() {
        let auth = service();
        let created = auth.signup(signup("a@x.com", "secret1")).await.unwrap();
        let session = auth
            .login(LoginInput {
                email: "A@X.COM".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        assert_eq!(session.user.id, created.user.id);
    }
}
