//! Storage contract for family groups.
//!
//! The service only needs four operations from its store. The unique
//! constraint on `code` lives in the store; `insert` reports a lost race as
//! [`StoreError::CodeTaken`] so the caller can redraw.

use std::future::Future;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{FamilyGroup, GroupCode, NewFamilyGroup};

/// Errors reported by a [`GroupStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another group already holds this code.
    #[error("Family code {0} is already in use")]
    CodeTaken(GroupCode),
    /// No group with this id exists.
    #[error("Family group not found: {0}")]
    GroupNotFound(Uuid),
    /// The underlying database failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub trait GroupStore: Send + Sync {
    fn find_by_code(
        &self,
        code: &GroupCode,
    ) -> impl Future<Output = Result<Option<FamilyGroup>, StoreError>> + Send;

    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<FamilyGroup>, StoreError>> + Send;

    /// Inserts a group with no members. Fails with `CodeTaken` when the code
    /// is held by another group.
    fn insert(
        &self,
        group: &NewFamilyGroup,
    ) -> impl Future<Output = Result<FamilyGroup, StoreError>> + Send;

    /// Adds a member to a group. Adding an existing member is a no-op.
    fn append_member(
        &self,
        group_id: Uuid,
        member_id: &str,
    ) -> impl Future<Output = Result<FamilyGroup, StoreError>> + Send;
}
