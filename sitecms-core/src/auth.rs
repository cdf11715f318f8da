//! Editor sessions.
//!
//! Reads are public; every write carries a session issued by an external
//! auth collaborator (for `sitecms-server`, an API key).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An authenticated principal allowed to write site content.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub principal: String,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(principal: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            token: token.into(),
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// A session is valid when it carries a token and has not expired.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.token.trim().is_empty() {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => now < expires_at,
            None => true,
        }
    }
}

// Tokens stay out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("principal", &self.principal)
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_session_without_expiry_is_valid() {
        let session = Session::new("alice", "key-123");
        assert!(session.is_valid());
    }

    #[test]
    fn test_empty_token_is_invalid() {
        assert!(!Session::new("alice", "").is_valid());
        assert!(!Session::new("alice", "   ").is_valid());
    }

    #[test]
    fn test_expired_session_is_invalid() {
        let now = Utc::now();
        let session = Session::new("alice", "key").with_expiry(now - Duration::minutes(1));
        assert!(!session.is_valid_at(now));

        let session = Session::new("alice", "key").with_expiry(now + Duration::minutes(5));
        assert!(session.is_valid_at(now));
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("alice", "super-secret");
        let debug = format!("{:?}", session);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("super-secret"));
    }
}
