use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of digits in a family group code.
pub const CODE_WIDTH: usize = 4;
/// Smallest issuable code.
pub const CODE_MIN: u16 = 1000;
/// Largest issuable code.
pub const CODE_MAX: u16 = 9999;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid family code '{0}': expected 4 digits between 1000 and 9999")]
pub struct InvalidGroupCode(pub String);

/// A short numeric code identifying a family group.
///
/// Always exactly [`CODE_WIDTH`] ASCII digits in `CODE_MIN..=CODE_MAX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupCode(String);

impl GroupCode {
    /// Builds a code from a number in the issuable range.
    pub fn from_number(n: u16) -> Result<Self, InvalidGroupCode> {
        if !(CODE_MIN..=CODE_MAX).contains(&n) {
            return Err(InvalidGroupCode(n.to_string()));
        }
        Ok(Self(format!("{:0width$}", n, width = CODE_WIDTH)))
    }

    /// Parses user input. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Result<Self, InvalidGroupCode> {
        let trimmed = s.trim();
        if trimmed.len() != CODE_WIDTH || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidGroupCode(s.to_string()));
        }
        let n: u16 = trimmed
            .parse()
            .map_err(|_| InvalidGroupCode(s.to_string()))?;
        Self::from_number(n).map_err(|_| InvalidGroupCode(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GroupCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GroupCode {
    type Error = InvalidGroupCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<GroupCode> for String {
    fn from(code: GroupCode) -> Self {
        code.0
    }
}
