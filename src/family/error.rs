use thiserror::Error;

use super::store::StoreError;

/// Errors returned by family group operations.
#[derive(Debug, Error)]
pub enum FamilyError {
    /// Input failed a policy check (name, password length, code format).
    #[error("{0}")]
    Validation(String),
    /// No group matches the code.
    #[error("No family group matches that code")]
    NotFound,
    /// The shared password did not match.
    #[error("Incorrect family password")]
    InvalidCredentials,
    /// Every drawn code was already taken.
    #[error("Could not find a free family code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },
    /// The group store failed.
    #[error("Failed to persist family group: {0}")]
    Persistence(#[from] StoreError),
    /// The secret hasher failed.
    #[error("Failed to hash family password: {0}")]
    Hashing(String),
}
