//! Client-secret generation, hashing, and verification.
//!
//! Secrets are stored as Argon2id PHC strings so the algorithm parameters and
//! salt travel with the hash. The plaintext is shown to the operator once.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::distr::{Alphanumeric, SampleString};
use uuid::Uuid;

/// Length of generated client secrets.
pub const SECRET_LENGTH: usize = 40;

/// Generate a fresh `(client_id, client_secret)` pair.
pub fn generate_client_credentials() -> (String, String) {
    let client_id = Uuid::new_v4().simple().to_string();
    let secret = Alphanumeric.sample_string(&mut rand::rng(), SECRET_LENGTH);
    (client_id, secret)
}

/// Hash a plaintext client secret using Argon2id with a random salt.
pub fn hash_secret(secret: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(secret.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext secret against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only for an unparseable hash.
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(secret.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}
