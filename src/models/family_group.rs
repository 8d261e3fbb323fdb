use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use super::group_code::GroupCode;

/// A family group as persisted in the group store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyGroup {
    pub id: Uuid,
    pub name: String,
    pub code: GroupCode,
    /// Argon2 PHC string. Never sent to clients.
    #[serde(skip_serializing, default)]
    pub secret_hash: String,
    pub members: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl FamilyGroup {
    pub fn has_member(&self, member_id: &str) -> bool {
        self.members.contains(member_id)
    }
}

impl fmt::Display for FamilyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count()))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Code: {}", self.code)?;
        writeln!(f, "Created: {}", self.created_at.format("%Y-%m-%d %H:%M"))?;

        if self.members.is_empty() {
            writeln!(f, "\nNo members yet")?;
        } else {
            writeln!(f, "\nMembers:")?;
            for member in &self.members {
                writeln!(f, "  - {}", member)?;
            }
        }

        Ok(())
    }
}

/// A group ready to be inserted. The store assigns nothing; the id and
/// code are chosen by the caller.
#[derive(Debug, Clone)]
pub struct NewFamilyGroup {
    pub id: Uuid,
    pub name: String,
    pub code: GroupCode,
    pub secret_hash: String,
    pub created_at: DateTime<Utc>,
}

impl NewFamilyGroup {
    pub fn new(name: impl Into<String>, code: GroupCode, secret_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            code,
            secret_hash: secret_hash.into(),
            created_at: Utc::now(),
        }
    }

    /// Same group with a different code, used when a code is lost to a
    /// concurrent insert.
    pub fn with_code(mut self, code: GroupCode) -> Self {
        self.code = code;
        self
    }

    pub fn into_group(self) -> FamilyGroup {
        FamilyGroup {
            id: self.id,
            name: self.name,
            code: self.code,
            secret_hash: self.secret_hash,
            members: BTreeSet::new(),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FamilyGroup {
        NewFamilyGroup::new("Smiths", GroupCode::parse("4821").unwrap(), "$argon2id$fake")
            .into_group()
    }

    #[test]
    fn test_new_group_has_no_members() {
        let group = sample();
        assert_eq!(group.name, "Smiths");
        assert!(group.members.is_empty());
        assert!(!group.has_member("user-42"));
    }

    #[test]
    fn test_with_code_keeps_identity() {
        let new = NewFamilyGroup::new("Smiths", GroupCode::parse("4821").unwrap(), "h");
        let id = new.id;
        let moved = new.with_code(GroupCode::parse("1234").unwrap());
        assert_eq!(moved.id, id);
        assert_eq!(moved.code.as_str(), "1234");
    }

    #[test]
    fn test_json_hides_secret_hash() {
        let mut group = sample();
        group.members.insert("user-42".to_string());

        let json = serde_json::to_value(&group).unwrap();
        assert!(json.get("secretHash").is_none());
        assert_eq!(json["code"], "4821");
        assert_eq!(json["members"][0], "user-42");
    }

    #[test]
    fn test_display() {
        let mut group = sample();
        let output = format!("{}", group);
        assert!(output.contains("Smiths"));
        assert!(output.contains("Code: 4821"));
        assert!(output.contains("No members yet"));

        group.members.insert("user-42".to_string());
        let output = format!("{}", group);
        assert!(output.contains("  - user-42"));
    }
}
