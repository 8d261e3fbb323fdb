//! Bearer sessions issued when a member joins a family group.
//!
//! Sessions are stored in memory and expire after a configurable time.
//! Unlike one-shot tokens they stay valid for repeated use until expiry.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Data associated with a session token.
#[derive(Debug, Clone)]
pub struct Session {
    /// Group the session is scoped to.
    pub group_id: Uuid,
    /// Member the session was issued to.
    pub member_id: String,
    /// When the session was created.
    pub created_at: Instant,
    /// When the session expires.
    pub expires_at: Instant,
}

/// In-memory session store with expiry.
///
/// Thread-safe via internal RwLock.
#[derive(Debug)]
pub struct SessionStore {
    /// Sessions indexed by token string.
    sessions: RwLock<HashMap<String, Session>>,
    /// Default expiry duration.
    default_expiry: Duration,
}

impl SessionStore {
    /// Creates a new session store with the specified default expiry in minutes.
    pub fn new(expiry_minutes: u64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            default_expiry: Duration::from_secs(expiry_minutes * 60),
        }
    }

    /// Issues a session token for a member of a group.
    ///
    /// Returns the token string (32 bytes, base64url encoded).
    pub fn issue(&self, group_id: Uuid, member_id: &str) -> String {
        self.issue_with_expiry(group_id, member_id, self.default_expiry)
    }

    /// Issues a session token with a custom expiry duration.
    pub fn issue_with_expiry(&self, group_id: Uuid, member_id: &str, expiry: Duration) -> String {
        let token = generate_token();
        let now = Instant::now();

        let session = Session {
            group_id,
            member_id: member_id.to_string(),
            created_at: now,
            expires_at: now + expiry,
        };

        self.write().insert(token.clone(), session);

        token
    }

    /// Returns the session for a token if it exists and has not expired.
    pub fn validate(&self, token: &str) -> Option<Session> {
        let sessions = self.read();
        let session = sessions.get(token)?;

        if Instant::now() > session.expires_at {
            return None;
        }

        Some(session.clone())
    }

    /// Removes all expired sessions.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired(&self) -> usize {
        let mut sessions = self.write();
        let now = Instant::now();

        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        let after = sessions.len();

        before - after
    }

    /// Returns the number of sessions currently stored.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if no sessions are stored.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(24 * 60) // one day
    }
}

/// Generates a secure random token.
///
/// Returns 32 random bytes encoded as base64url (no padding).
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_issue_returns_unique() {
        let store = SessionStore::new(10);
        let group = Uuid::new_v4();

        let token1 = store.issue(group, "alice");
        let token2 = store.issue(group, "alice");

        assert_ne!(token1, token2);
        assert_eq!(token1.len(), 43); // 32 bytes base64url = 43 chars
    }

    #[test]
    fn test_validate_valid_token() {
        let store = SessionStore::new(10);
        let group = Uuid::new_v4();

        let token = store.issue(group, "user-42");
        let session = store.validate(&token).unwrap();

        assert_eq!(session.group_id, group);
        assert_eq!(session.member_id, "user-42");
    }

    #[test]
    fn test_validate_is_reusable() {
        let store = SessionStore::new(10);
        let token = store.issue(Uuid::new_v4(), "user-42");

        assert!(store.validate(&token).is_some());
        assert!(store.validate(&token).is_some());
    }

    #[test]
    fn test_validate_unknown_token() {
        let store = SessionStore::new(10);

        assert!(store.validate("nonexistent-token").is_none());
    }

    #[test]
    fn test_validate_expired_token() {
        let store = SessionStore::new(10);

        // Create session that expires immediately
        let token = store.issue_with_expiry(Uuid::new_v4(), "user-42", Duration::from_secs(0));

        // Small sleep to ensure expiry
        thread::sleep(Duration::from_millis(10));

        assert!(store.validate(&token).is_none());
    }

    #[test]
    fn test_cleanup_expired() {
        let store = SessionStore::new(10);
        let group = Uuid::new_v4();

        store.issue_with_expiry(group, "a", Duration::from_secs(0));
        store.issue_with_expiry(group, "b", Duration::from_secs(0));
        store.issue(group, "c"); // not expired

        // Wait for expiry
        thread::sleep(Duration::from_millis(10));

        assert_eq!(store.len(), 3);

        let removed = store.cleanup_expired();

        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_generate_token_format() {
        let token = generate_token();

        // Should be base64url, 43 characters (32 bytes)
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
