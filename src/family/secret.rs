//! Shared-password hashing.
//!
//! Family passwords are stored as Argon2id PHC strings, which carry their
//! own salt and cost parameters.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Hashes and verifies shared secrets.
///
/// Both calls are CPU bound; async callers should run them on a blocking
/// thread.
pub trait SecretHasher: Send + Sync + 'static {
    fn hash(&self, plaintext: &str) -> Result<String, String>;

    /// Returns false for a mismatch or an unparseable hash.
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2id hasher with configurable cost.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Creates a hasher with explicit cost parameters.
    ///
    /// `memory_kib` must be at least `8 * parallelism`.
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, String> {
        let params =
            Params::new(memory_kib, iterations, parallelism, None).map_err(|e| e.to_string())?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl SecretHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| e.to_string())
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Stored family hash is not a valid PHC string: {}", e);
                return false;
            }
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
