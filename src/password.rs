//! Password hashing with Argon2id.
//!
//! Both customer accounts and the admin password go through this module;
//! nothing in the crate ever stores or compares a plaintext password. Hashes
//! use the PHC string format so parameters can be upgraded without a
//! migration, and verification is constant-time.

use crate::errors::{Error, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

// Argon2id parameters per the 2024 OWASP password-storage guidance:
// 19 MiB memory, 2 iterations, single lane, 256-bit output.
const MEMORY_COST: u32 = 19_456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32;

fn hasher() -> Result<Argon2<'static>> {
    let params =
        Params::new(MEMORY_COST, TIME_COST, PARALLELISM, Some(OUTPUT_LEN)).map_err(|e| {
            Error::Password {
                message: format!("invalid argon2 parameters: {e}"),
            }
        })?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with a fresh random salt.
///
/// Returns a PHC-formatted string (`$argon2id$...`) embedding the algorithm,
/// parameters, salt and hash.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Password {
            message: format!("failed to hash password: {e}"),
        })
}

/// Verifies a password against a stored PHC hash in constant time.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash itself is
/// malformed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| Error::Password {
        message: format!("invalid stored password hash: {e}"),
    })?;
    Ok(hasher()?
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
