use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::family::{GroupStore, StoreError};
use crate::models::{FamilyGroup, GroupCode, NewFamilyGroup};

#[derive(Clone)]
pub struct GroupRepository {
    pool: SqlitePool,
}

// Row types for database queries
#[derive(sqlx::FromRow)]
struct GroupRow {
    id: String,
    name: String,
    code: String,
    secret_hash: String,
    created_at: String,
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    member_id: String,
}

impl GroupRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists all groups, oldest first.
    pub async fn list(&self) -> Result<Vec<FamilyGroup>, sqlx::Error> {
        let rows: Vec<GroupRow> =
            sqlx::query_as("SELECT * FROM family_groups ORDER BY created_at, code")
                .fetch_all(&self.pool)
                .await?;

        let mut groups = Vec::with_capacity(rows.len());
        for row in rows {
            groups.push(self.hydrate_group(row).await?);
        }
        Ok(groups)
    }

    async fn get_by_code(&self, code: &GroupCode) -> Result<Option<FamilyGroup>, sqlx::Error> {
        let row: Option<GroupRow> = sqlx::query_as("SELECT * FROM family_groups WHERE code = ?")
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => self.hydrate_group(row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<FamilyGroup>, sqlx::Error> {
        let row: Option<GroupRow> = sqlx::query_as("SELECT * FROM family_groups WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => self.hydrate_group(row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn create(&self, group: &NewFamilyGroup) -> Result<FamilyGroup, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO family_groups (id, name, code, secret_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(group.id.to_string())
        .bind(&group.name)
        .bind(group.code.as_str())
        .bind(&group.secret_hash)
        .bind(group.created_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(group.clone().into_group()),
            // The only unique key a fresh v4 id can realistically hit is the code index
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::CodeTaken(group.code.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn add_member(&self, group_id: Uuid, member_id: &str) -> Result<FamilyGroup, StoreError> {
        let id_str = group_id.to_string();

        let row: Option<GroupRow> = sqlx::query_as("SELECT * FROM family_groups WHERE id = ?")
            .bind(&id_str)
            .fetch_optional(&self.pool)
            .await?;
        let row = row.ok_or(StoreError::GroupNotFound(group_id))?;

        // Primary key (group_id, member_id) makes repeat joins a no-op
        sqlx::query(
            "INSERT OR IGNORE INTO family_members (group_id, member_id, joined_at) VALUES (?, ?, ?)",
        )
        .bind(&id_str)
        .bind(member_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(self.hydrate_group(row).await?)
    }

    async fn hydrate_group(&self, row: GroupRow) -> Result<FamilyGroup, sqlx::Error> {
        let members: Vec<MemberRow> =
            sqlx::query_as("SELECT member_id FROM family_members WHERE group_id = ?")
                .bind(&row.id)
                .fetch_all(&self.pool)
                .await?;

        Ok(FamilyGroup {
            id: Uuid::parse_str(&row.id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            name: row.name,
            code: GroupCode::parse(&row.code).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            secret_hash: row.secret_hash,
            members: members.into_iter().map(|m| m.member_id).collect(),
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

impl GroupStore for GroupRepository {
    async fn find_by_code(&self, code: &GroupCode) -> Result<Option<FamilyGroup>, StoreError> {
        Ok(self.get_by_code(code).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FamilyGroup>, StoreError> {
        Ok(self.get_by_id(id).await?)
    }

    async fn insert(&self, group: &NewFamilyGroup) -> Result<FamilyGroup, StoreError> {
        self.create(group).await
    }

    async fn append_member(&self, group_id: Uuid, member_id: &str) -> Result<FamilyGroup, StoreError> {
        self.add_member(group_id, member_id).await
    }
}
