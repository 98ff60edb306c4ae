//! Group - Named collection of users and groups

use serde::{Deserialize, Serialize};

use super::{Member, MemberRef};

// =============================================================================
// Group
// =============================================================================

/// A group of members.
///
/// Membership may nest and may even be cyclic; engines that resolve nested
/// groups are responsible for guarding against that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier
    pub id: String,
    /// Unique display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Owning member, if any
    pub owner: Option<Box<Member>>,
    /// Members; duplicates are allowed. Insertion order is kept by the
    /// in-memory and key-value engines, not by the relational engine.
    pub members: Vec<Member>,
}

impl Group {
    /// Create a group with a generated UUID v4 id and no members.
    ///
    /// # Panics
    /// Panics if `name` is empty.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    /// Create a builder for a group with the given name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> GroupBuilder {
        GroupBuilder::new(name.into())
    }

    /// `(id, kind)` keys of the direct members, in order.
    #[must_use]
    pub fn member_refs(&self) -> Vec<MemberRef> {
        self.members.iter().map(Member::member_ref).collect()
    }

    /// Whether `member` appears among the direct members.
    #[must_use]
    pub fn contains(&self, member: &MemberRef) -> bool {
        self.members
            .iter()
            .any(|m| m.kind() == member.kind && m.id() == member.id)
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Group: {}, ID: {}, Members:", self.name, self.id)?;
        for member in &self.members {
            writeln!(f, "\t{member}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Group Builder
// =============================================================================

/// Builder for [`Group`] with fluent API.
#[derive(Debug)]
pub struct GroupBuilder {
    id: Option<String>,
    name: String,
    description: String,
    owner: Option<Box<Member>>,
    members: Vec<Member>,
}

impl GroupBuilder {
    fn new(name: String) -> Self {
        Self {
            id: None,
            name,
            description: String::new(),
            owner: None,
            members: Vec::new(),
        }
    }

    /// Set custom ID.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the owner.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<Member>) -> Self {
        self.owner = Some(Box::new(owner.into()));
        self
    }

    /// Append a member.
    #[must_use]
    pub fn with_member(mut self, member: impl Into<Member>) -> Self {
        self.members.push(member.into());
        self
    }

    /// Build the group.
    ///
    /// # Panics
    /// Panics if the name is empty.
    #[must_use]
    pub fn build(self) -> Group {
        assert!(!self.name.is_empty(), "group name cannot be empty");

        Group {
            id: self.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: self.name,
            description: self.description,
            owner: self.owner,
            members: self.members,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
