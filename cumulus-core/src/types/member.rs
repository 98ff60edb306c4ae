//! Member - Anything that can belong to a group

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Group, User};
use crate::storage::StorageError;

// =============================================================================
// Member Kind
// =============================================================================

/// Discriminant persisted next to a member id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// A user account
    User,
    /// A (possibly nested) group
    Group,
}

impl MemberKind {
    /// Get string representation, as stored in `group_members.member_type`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }
}

impl FromStr for MemberKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "group" => Ok(Self::Group),
            other => Err(StorageError::InvalidMemberType(other.to_string())),
        }
    }
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Member Ref
// =============================================================================

/// The `(id, kind)` key of a member, without its record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberRef {
    /// Member id
    pub id: String,
    /// Member kind
    pub kind: MemberKind,
}

impl MemberRef {
    /// Create a member reference.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: MemberKind) -> Self {
        Self { id: id.into(), kind }
    }
}

impl std::fmt::Display for MemberRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

// =============================================================================
// Member
// =============================================================================

/// A group member: either a user or another group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Member {
    /// A user
    User(User),
    /// A nested group
    Group(Group),
}

impl Member {
    /// Id of the wrapped record.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::User(user) => &user.id,
            Self::Group(group) => &group.id,
        }
    }

    /// Kind of the wrapped record.
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        match self {
            Self::User(_) => MemberKind::User,
            Self::Group(_) => MemberKind::Group,
        }
    }

    /// `(id, kind)` key of this member.
    #[must_use]
    pub fn member_ref(&self) -> MemberRef {
        MemberRef::new(self.id(), self.kind())
    }
}

impl From<User> for Member {
    fn from(user: User) -> Self {
        Self::User(user)
    }
}

impl From<Group> for Member {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(user) => write!(f, "{user}"),
            Self::Group(group) => write!(f, "{group}"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_kind_round_trip_str() {
        assert_eq!(MemberKind::User.as_str(), "user");
        assert_eq!(MemberKind::Group.as_str(), "group");
        assert_eq!("user".parse::<MemberKind>().unwrap(), MemberKind::User);
        assert_eq!("group".parse::<MemberKind>().unwrap(), MemberKind::Group);
    }

    #[test]
    fn test_member_kind_rejects_unknown() {
        let err = "robot".parse::<MemberKind>().unwrap_err();
        assert!(matches!(err, StorageError::InvalidMemberType(ref t) if t == "robot"));
    }

    #[test]
    fn test_member_dispatch() {
        let user = User::builder("alice", "alice@example.com").with_id("u1").build();
        let group = Group::builder("devs").with_id("g1").build();

        let m1 = Member::from(user);
        let m2 = Member::from(group);

        assert_eq!(m1.id(), "u1");
        assert_eq!(m1.kind(), MemberKind::User);
        assert_eq!(m2.id(), "g1");
        assert_eq!(m2.member_ref(), MemberRef::new("g1", MemberKind::Group));
    }

    #[test]
    fn test_member_serializes_with_type_tag() {
        let member = Member::from(User::builder("alice", "alice@example.com").with_id("u1").build());
        let json = serde_json::to_value(&member).unwrap();

        assert_eq!(json["type"], "user");
        assert_eq!(json["id"], "u1");

        let back: Member = serde_json::from_value(json).unwrap();
        assert_eq!(back, member);
    }
}
