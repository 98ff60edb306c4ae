//! Storage errors

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors returned by every storage engine.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No user with the given id
    #[error("user not found")]
    UserNotFound,

    /// No user with the given username
    #[error("username not found")]
    UsernameNotFound,

    /// No user with the given email
    #[error("email not found")]
    EmailNotFound,

    /// A user with this id is already stored
    #[error("user already exists")]
    UserAlreadyExists,

    /// No group with the given id or name
    #[error("group not found")]
    GroupNotFound,

    /// A group with this id is already stored
    #[error("group already exists")]
    GroupAlreadyExists,

    /// No session with the given id or owner
    #[error("session not found")]
    SessionNotFound,

    /// A session with this id is already stored
    #[error("session already exists")]
    SessionAlreadyExists,

    /// The session is past its expiry
    #[error("session expired")]
    SessionExpired,

    /// The group has no such member
    #[error("member not found")]
    MemberNotFound,

    /// The member is already recorded in the group
    #[error("member already exists")]
    MemberAlreadyExists,

    /// Stored member discriminant is neither "user" nor "group"
    #[error("invalid member type: {0}")]
    InvalidMemberType(String),

    /// Nested groups exceed the resolution depth limit
    #[error("group membership nested deeper than {depth} levels")]
    MembershipTooDeep {
        /// Depth at which resolution stopped
        depth: usize,
    },

    /// The engine could not be reached
    #[error("connection error: {0}")]
    Connection(String),

    /// Any other engine failure
    #[error("backend error: {0}")]
    Backend(String),

    /// Record could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Connection-level failure.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Failure reported by the backend that has no dedicated variant.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Whether this is any of the "not found" errors.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound
                | Self::UsernameNotFound
                | Self::EmailNotFound
                | Self::GroupNotFound
                | Self::SessionNotFound
                | Self::MemberNotFound
        )
    }

    /// Whether this is any of the "already exists" errors.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            Self::UserAlreadyExists
                | Self::GroupAlreadyExists
                | Self::SessionAlreadyExists
                | Self::MemberAlreadyExists
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(StorageError::MemberAlreadyExists.is_already_exists());
        assert!(StorageError::GroupAlreadyExists.is_already_exists());
        assert!(!StorageError::MemberAlreadyExists.is_not_found());
        assert!(StorageError::EmailNotFound.is_not_found());
        assert!(!StorageError::backend("boom").is_already_exists());
        assert_eq!(
            StorageError::MembershipTooDeep { depth: 32 }.to_string(),
            "group membership nested deeper than 32 levels"
        );
    }
}
