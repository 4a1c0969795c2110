//! Password value object - one-way salted hashing.
//!
//! Hashes are Argon2id PHC strings, handed to storage as opaque bytes.
//! The work factor is fixed by [`crate::constants`] rather than taken from
//! the library default, so stored hashes stay comparable across upgrades.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::constants::{
    PASSWORD_HASH_ITERATIONS, PASSWORD_HASH_MEMORY_KIB, PASSWORD_HASH_PARALLELISM,
};
use crate::error::{DomainError, DomainResult};

/// Hashed password as stored by the credential store.
///
/// There is intentionally no `PartialEq`: hashes are only ever checked
/// through [`Password::verify`].
#[derive(Clone)]
pub struct Password {
    hash: Vec<u8>,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain text password with a fresh random salt.
    ///
    /// # Errors
    /// Returns [`DomainError::Password`] if the hasher rejects its input.
    pub fn hash(plain_text: &str) -> DomainResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = argon2()?
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::password(format!("hash failed: {}", e)))?;

        Ok(Self {
            hash: hash.to_string().into_bytes(),
        })
    }

    /// Wrap hash bytes loaded from storage.
    pub fn from_hash(hash: Vec<u8>) -> Self {
        Self { hash }
    }

    /// Hash bytes for storage.
    pub fn as_bytes(&self) -> &[u8] {
        &self.hash
    }

    /// Consume and return the hash bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// A malformed stored hash never verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        let Ok(encoded) = std::str::from_utf8(&self.hash) else {
            return false;
        };
        let Ok(parsed) = PasswordHash::new(encoded) else {
            return false;
        };

        // Parameters are read back from the PHC string, so verification
        // keeps working for hashes made with an older work factor.
        Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok()
    }
}

fn argon2() -> DomainResult<Argon2<'static>> {
    let params = Params::new(
        PASSWORD_HASH_MEMORY_KIB,
        PASSWORD_HASH_ITERATIONS,
        PASSWORD_HASH_PARALLELISM,
        None,
    )
    .map_err(|e| DomainError::password(format!("invalid hash parameters: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}
