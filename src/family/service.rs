//! Family group creation and joining.

use std::sync::Arc;
use uuid::Uuid;

use super::code::CodeIssuer;
use super::error::FamilyError;
use super::secret::SecretHasher;
use super::store::{GroupStore, StoreError};
use crate::models::{FamilyGroup, GroupCode, NewFamilyGroup};

/// Input limits for new groups.
#[derive(Debug, Clone)]
pub struct GroupPolicy {
    pub min_password_len: usize,
    pub max_name_len: usize,
}

impl Default for GroupPolicy {
    fn default() -> Self {
        Self {
            min_password_len: 8,
            max_name_len: 100,
        }
    }
}

impl GroupPolicy {
    /// Checks a group name and shared password, returning the trimmed name.
    pub fn validate<'a>(&self, name: &'a str, password: &str) -> Result<&'a str, FamilyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FamilyError::Validation(
                "Family name must not be empty".to_string(),
            ));
        }
        if name.chars().count() > self.max_name_len {
            return Err(FamilyError::Validation(format!(
                "Family name must be at most {} characters",
                self.max_name_len
            )));
        }
        if password.chars().count() < self.min_password_len {
            return Err(FamilyError::Validation(format!(
                "Family password must be at least {} characters",
                self.min_password_len
            )));
        }
        Ok(name)
    }
}

/// Result of a successful `create`.
#[derive(Debug, Clone)]
pub struct CreatedGroup {
    pub id: Uuid,
    pub code: GroupCode,
}

/// Result of a successful `join`.
#[derive(Debug, Clone)]
pub struct Membership {
    pub group: FamilyGroup,
    pub member_id: String,
    /// False when the member already belonged to the group.
    pub newly_joined: bool,
}

pub struct FamilyGroupService<S, H> {
    store: S,
    hasher: Arc<H>,
    issuer: CodeIssuer,
    policy: GroupPolicy,
}

impl<S: GroupStore, H: SecretHasher> FamilyGroupService<S, H> {
    pub fn new(store: S, hasher: H, issuer: CodeIssuer, policy: GroupPolicy) -> Self {
        Self {
            store,
            hasher: Arc::new(hasher),
            issuer,
            policy,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a group protected by `shared_password` and returns its code.
    ///
    /// A code lost to a concurrent insert is redrawn; nothing is reserved
    /// before the insert commits, so a failed create consumes no code.
    pub async fn create(
        &self,
        name: &str,
        shared_password: &str,
    ) -> Result<CreatedGroup, FamilyError> {
        let name = self.policy.validate(name, shared_password)?;
        let secret_hash = self.hash(shared_password).await?;

        let mut pending: Option<NewFamilyGroup> = None;
        for attempt in 1..=self.issuer.max_attempts() {
            let code = self.issuer.generate(&self.store).await?;
            let group = match pending.take() {
                Some(group) => group.with_code(code),
                None => NewFamilyGroup::new(name, code, secret_hash.clone()),
            };

            match self.store.insert(&group).await {
                Ok(created) => {
                    tracing::info!(
                        "Created family group {} with code {}",
                        created.id,
                        created.code
                    );
                    return Ok(CreatedGroup {
                        id: created.id,
                        code: created.code,
                    });
                }
                Err(StoreError::CodeTaken(code)) => {
                    tracing::debug!(
                        "Family code {} taken concurrently (attempt {}), redrawing",
                        code,
                        attempt
                    );
                    pending = Some(group);
                }
                Err(e) => {
                    tracing::error!("Failed to insert family group: {}", e);
                    return Err(e.into());
                }
            }
        }

        Err(FamilyError::CodeSpaceExhausted {
            attempts: self.issuer.max_attempts(),
        })
    }

    /// Admits `requester_id` into the group identified by `code`.
    ///
    /// Joining a group one already belongs to succeeds without changes.
    pub async fn join(
        &self,
        code: &str,
        shared_password: &str,
        requester_id: &str,
    ) -> Result<Membership, FamilyError> {
        let code = GroupCode::parse(code).map_err(|e| FamilyError::Validation(e.to_string()))?;
        if requester_id.trim().is_empty() {
            return Err(FamilyError::Validation(
                "Member id must not be empty".to_string(),
            ));
        }

        let group = match self.store.find_by_code(&code).await? {
            Some(group) => group,
            None => {
                tracing::warn!("Join attempt for unknown family code {}", code);
                return Err(FamilyError::NotFound);
            }
        };

        if !self.verify(shared_password, &group.secret_hash).await? {
            tracing::warn!("Join attempt with wrong password for family code {}", code);
            return Err(FamilyError::InvalidCredentials);
        }

        if group.has_member(requester_id) {
            return Ok(Membership {
                group,
                member_id: requester_id.to_string(),
                newly_joined: false,
            });
        }

        let group = self.store.append_member(group.id, requester_id).await?;
        tracing::info!("Member {} joined family group {}", requester_id, group.id);

        Ok(Membership {
            group,
            member_id: requester_id.to_string(),
            newly_joined: true,
        })
    }

    /// Fetches a group by id.
    pub async fn group(&self, group_id: Uuid) -> Result<FamilyGroup, FamilyError> {
        self.store
            .find_by_id(group_id)
            .await?
            .ok_or(FamilyError::NotFound)
    }

    async fn hash(&self, plaintext: &str) -> Result<String, FamilyError> {
        let hasher = Arc::clone(&self.hasher);
        let plaintext = plaintext.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| FamilyError::Hashing(e.to_string()))?
            .map_err(FamilyError::Hashing)
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, FamilyError> {
        let hasher = Arc::clone(&self.hasher);
        let plaintext = plaintext.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash))
            .await
            .map_err(|e| FamilyError::Hashing(e.to_string()))
    }
}
