//! Family groups: code issuance, creation and joining.

mod code;
mod error;
mod secret;
mod service;
mod store;

#[cfg(test)]
mod test_support;

pub use code::{CodeIssuer, DEFAULT_MAX_ATTEMPTS};
pub use error::FamilyError;
pub use secret::{Argon2Hasher, SecretHasher};
pub use service::{CreatedGroup, FamilyGroupService, GroupPolicy, Membership};
pub use store::{GroupStore, StoreError};
