//! Session tokens: HS256-signed JWTs carrying a [`Claims`] payload.
//!
//! Tokens are stateless. Possession proves authentication until `exp`, or until
//! the signing secret rotates. Verification failures are opaque:
//! a bad signature, a malformed token and an expired token all surface as
//! [`TokenError::Invalid`].

use catalog_core::roles::Role;
use catalog_core::types::DbId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the identity's id.
    pub sub: DbId,
    /// Role at issue time. Informational only: authorization uses the live role.
    pub role: Role,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for log correlation.
    pub jti: String,
}

/// Configuration for token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Session token lifetime in minutes (default: 1440, one day).
    pub expiry_mins: i64,
}

/// Default session lifetime in minutes.
const DEFAULT_EXPIRY_MINS: i64 = 24 * 60;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var           | Required | Default |
    /// |-------------------|----------|---------|
    /// | `JWT_SECRET`      | **yes**  | --      |
    /// | `JWT_EXPIRY_MINS` | no       | `1440`  |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let expiry_mins: i64 = std::env::var("JWT_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            expiry_mins,
        }
    }
}

/// What a verified token vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject_id: DbId,
    pub role: Role,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Signature mismatch, malformed structure or elapsed expiry.
    #[error("Invalid or expired token")]
    Invalid,

    #[error("Token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies session tokens with one server secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    session_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token is never accepted after `exp`.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            session_ttl: Duration::minutes(config.expiry_mins),
        }
    }

    /// Lifetime applied by [`TokenService::issue_session`].
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Sign a token for `subject_id` expiring `ttl` from now.
    pub fn issue(&self, subject_id: DbId, role: Role, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject_id,
            role,
            exp: now + ttl.num_seconds(),
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)
    }

    /// Sign a token with the configured session lifetime.
    pub fn issue_session(&self, subject_id: DbId, role: Role) -> Result<String, TokenError> {
        self.issue(subject_id, role, self.session_ttl)
    }

    /// Check signature and expiry and return the embedded subject and role.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            TokenError::Invalid
        })?;

        Ok(VerifiedToken {
            subject_id: data.claims.sub,
            role: data.claims.role,
        })
    }
}
