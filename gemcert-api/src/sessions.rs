//! Session Store
//!
//! Login sessions with an explicit lifecycle: create on successful login,
//! expire after a fixed TTL, revoke on logout. Expired entries are purged
//! lazily on access. Replaces ad hoc process-wide mutable session maps.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// An active login session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub created_at: Instant,
    pub expires_at: Instant,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Concurrent session store keyed by opaque token.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Create a new session for the given user and return it.
    pub fn create(&self, username: &str) -> Session {
        let now = Instant::now();
        let session = Session {
            token: Uuid::new_v4().to_string(),
            username: username.to_string(),
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions.insert(session.token.clone(), session.clone());
        session
    }

    /// Look up a session by token. Expired sessions are removed and
    /// reported as absent.
    pub fn validate(&self, token: &str) -> Option<Session> {
        let expired = match self.sessions.get(token) {
            Some(entry) if !entry.is_expired() => return Some(entry.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.sessions.remove(token);
        }
        None
    }

    /// Revoke a session. Returns true if it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Drop all expired sessions.
    pub fn purge_expired(&self) {
        self.sessions.retain(|_, session| !session.is_expired());
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_validate() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.create("admin");
        let found = store.validate(&session.token).expect("session");
        assert_eq!(found.username, "admin");
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        let store = SessionStore::new(Duration::from_secs(60));
        assert!(store.validate("nope").is_none());
    }

    #[test]
    fn test_expired_session_is_purged_on_access() {
        let store = SessionStore::new(Duration::from_secs(0));
        let session = store.create("admin");
        assert!(store.validate(&session.token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_revoke() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.create("admin");
        assert!(store.revoke(&session.token));
        assert!(store.validate(&session.token).is_none());
        assert!(!store.revoke(&session.token));
    }

    #[test]
    fn test_purge_expired_keeps_live_sessions() {
        let live = SessionStore::new(Duration::from_secs(60));
        live.create("admin");
        live.purge_expired();
        assert_eq!(live.len(), 1);

        let dead = SessionStore::new(Duration::from_secs(0));
        dead.create("admin");
        dead.purge_expired();
        assert!(dead.is_empty());
    }
}
