//! Family code issuance.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use super::error::FamilyError;
use super::store::GroupStore;
use crate::models::{GroupCode, CODE_MAX, CODE_MIN};

/// Default number of draws before giving up on finding a free code.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;

/// Draws random family codes that no existing group holds.
///
/// The check is a read, so a code returned here can still be lost to a
/// concurrent insert. Callers insert with the store's unique constraint and
/// call `generate` again on conflict.
pub struct CodeIssuer {
    rng: Mutex<StdRng>,
    max_attempts: u32,
}

impl CodeIssuer {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Creates an issuer with a fixed seed, for reproducible draws.
    pub fn seeded(seed: u64, max_attempts: u32) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Draws one code without checking the store.
    pub fn draw(&self) -> GroupCode {
        let n = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .random_range(CODE_MIN..=CODE_MAX);
        GroupCode::from_number(n).unwrap_or_else(|_| unreachable!("{} drawn from code range", n))
    }

    /// Returns a code not held by any group in `store` at the time of the check.
    pub async fn generate<S: GroupStore>(&self, store: &S) -> Result<GroupCode, FamilyError> {
        for attempt in 1..=self.max_attempts {
            let code = self.draw();
            if store.find_by_code(&code).await?.is_none() {
                if attempt > 1 {
                    tracing::debug!("Found free family code after {} draws", attempt);
                }
                return Ok(code);
            }
        }

        tracing::warn!(
            "No free family code after {} draws; code space may be saturated",
            self.max_attempts
        );
        Err(FamilyError::CodeSpaceExhausted {
            attempts: self.max_attempts,
        })
    }
}

impl Default for CodeIssuer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::test_support::{MemoryGroupStore, SaturatedStore};
    use crate::models::NewFamilyGroup;

    #[test]
    fn test_draw_in_range() {
        let issuer = CodeIssuer::default();
        for _ in 0..1000 {
            let code = issuer.draw();
            let n: u16 = code.as_str().parse().unwrap();
            assert!((CODE_MIN..=CODE_MAX).contains(&n));
            assert_eq!(code.as_str().len(), 4);
        }
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let a = CodeIssuer::seeded(7, 10);
        let b = CodeIssuer::seeded(7, 10);
        for _ in 0..5 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[tokio::test]
    async fn test_generate_on_empty_store() {
        let store = MemoryGroupStore::default();
        let code = CodeIssuer::default().generate(&store).await.unwrap();
        assert!(store.find_by_code(&code).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_generate_redraws_on_collision() {
        let store = MemoryGroupStore::default();

        // Take the first code this seed will produce
        let taken = CodeIssuer::seeded(42, 10).draw();
        store
            .insert(&NewFamilyGroup::new("Taken", taken.clone(), "h"))
            .await
            .unwrap();

        let code = CodeIssuer::seeded(42, 10).generate(&store).await.unwrap();
        assert_ne!(code, taken);
        assert_eq!(store.lookups(), 2);
    }

    #[tokio::test]
    async fn test_generate_gives_up_when_saturated() {
        let store = SaturatedStore::default();
        let err = CodeIssuer::new(5).generate(&store).await.unwrap_err();

        assert!(matches!(err, FamilyError::CodeSpaceExhausted { attempts: 5 }));
        assert_eq!(store.lookups(), 5);
    }

    #[test]
    fn test_zero_attempts_clamped() {
        assert_eq!(CodeIssuer::new(0).max_attempts(), 1);
    }
}
