//! Credential hashing for stored identities.
//!
//! Only the PHC string produced here is ever persisted. It embeds the
//! Argon2id parameters and a fresh per-call salt, so verification needs
//! nothing but the stored string.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

pub type HashError = argon2::password_hash::Error;

/// One-way hash of `plaintext` for storage in `users.password_hash`.
pub fn hash_password(plaintext: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|phc| phc.to_string())
}

/// Compare `plaintext` with a stored PHC string.
///
/// A mismatch is `Ok(false)`; only an unparseable stored hash is an error.
pub fn verify_password(plaintext: &str, stored: &str) -> Result<bool, HashError> {
    let phc = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(plaintext.as_bytes(), &phc) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(other) => Err(other),
    }
}
