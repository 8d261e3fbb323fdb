//! In-memory group stores for exercising the service without SQLite.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use super::store::{GroupStore, StoreError};
use crate::models::{FamilyGroup, GroupCode, NewFamilyGroup};

/// Map-backed store enforcing code uniqueness on insert.
#[derive(Default)]
pub struct MemoryGroupStore {
    groups: Mutex<HashMap<Uuid, FamilyGroup>>,
    lookups: AtomicUsize,
    /// When set, `find_by_code` always reports the code as free, so every
    /// collision surfaces at insert time the way a lost race does.
    stale_reads: bool,
}

impl MemoryGroupStore {
    pub fn with_stale_reads() -> Self {
        Self {
            stale_reads: true,
            ..Self::default()
        }
    }

    /// Number of `find_by_code` calls so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.groups.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<FamilyGroup> {
        self.groups.lock().unwrap().values().cloned().collect()
    }
}

impl GroupStore for MemoryGroupStore {
    async fn find_by_code(&self, code: &GroupCode) -> Result<Option<FamilyGroup>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.stale_reads {
            return Ok(None);
        }
        let groups = self.groups.lock().unwrap();
        Ok(groups.values().find(|g| &g.code == code).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FamilyGroup>, StoreError> {
        Ok(self.groups.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, group: &NewFamilyGroup) -> Result<FamilyGroup, StoreError> {
        let mut groups = self.groups.lock().unwrap();
        if groups.values().any(|g| g.code == group.code) {
            return Err(StoreError::CodeTaken(group.code.clone()));
        }
        let created = group.clone().into_group();
        groups.insert(created.id, created.clone());
        Ok(created)
    }

    async fn append_member(&self, group_id: Uuid, member_id: &str) -> Result<FamilyGroup, StoreError> {
        let mut groups = self.groups.lock().unwrap();
        let group = groups
            .get_mut(&group_id)
            .ok_or(StoreError::GroupNotFound(group_id))?;
        group.members.insert(member_id.to_string());
        Ok(group.clone())
    }
}

/// Store in which every code is already taken.
#[derive(Default)]
pub struct SaturatedStore {
    lookups: AtomicUsize,
}

impl SaturatedStore {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl GroupStore for SaturatedStore {
    async fn find_by_code(&self, code: &GroupCode) -> Result<Option<FamilyGroup>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(Some(
            NewFamilyGroup::new("Occupied", code.clone(), "h").into_group(),
        ))
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<FamilyGroup>, StoreError> {
        Ok(None)
    }

    async fn insert(&self, group: &NewFamilyGroup) -> Result<FamilyGroup, StoreError> {
        Err(StoreError::CodeTaken(group.code.clone()))
    }

    async fn append_member(&self, group_id: Uuid, _member_id: &str) -> Result<FamilyGroup, StoreError> {
        Err(StoreError::GroupNotFound(group_id))
    }
}

/// Store whose writes fail as if the database were unavailable.
#[derive(Default)]
pub struct BrokenWriteStore {
    inner: MemoryGroupStore,
}

impl BrokenWriteStore {
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl GroupStore for BrokenWriteStore {
    async fn find_by_code(&self, code: &GroupCode) -> Result<Option<FamilyGroup>, StoreError> {
        self.inner.find_by_code(code).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FamilyGroup>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, _group: &NewFamilyGroup) -> Result<FamilyGroup, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn append_member(&self, _group_id: Uuid, _member_id: &str) -> Result<FamilyGroup, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}
