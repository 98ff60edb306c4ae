//! Session - A login session for a user
//!
//! The referenced user is not checked by any engine; a session may outlive
//! its user.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{StorageError, StorageResult};

/// A session belonging to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: String,
    /// Id of the owning user (not enforced)
    pub user_id: String,
    /// When the session stops being valid
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a session with a generated UUID v4 id.
    #[must_use]
    pub fn new(user_id: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            expires_at,
        }
    }

    /// Create a session valid for `ttl` from now.
    #[must_use]
    pub fn with_ttl(user_id: impl Into<String>, ttl: Duration) -> Self {
        Self::new(user_id, Utc::now() + ttl)
    }

    /// Replace the generated id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Whether the session has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Fail with [`StorageError::SessionExpired`] once the session has expired.
    ///
    /// # Errors
    /// Returns `SessionExpired` if `now` is at or past `expires_at`.
    pub fn ensure_active(&self, now: DateTime<Utc>) -> StorageResult<()> {
        if self.is_expired_at(now) {
            return Err(StorageError::SessionExpired);
        }
        Ok(())
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Session ID: {}, User: {}, Expires at: {}",
            self.id,
            self.user_id,
            self.expires_at.to_rfc3339()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let session = Session::new("user1", now + Duration::minutes(5)).with_id("s1");

        assert_eq!(session.id, "s1");
        assert!(!session.is_expired_at(now));
        assert!(session.ensure_active(now).is_ok());

        let later = now + Duration::minutes(5);
        assert!(session.is_expired_at(later));
        assert!(matches!(
            session.ensure_active(later),
            Err(StorageError::SessionExpired)
        ));
    }
}
