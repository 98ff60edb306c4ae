//! Team - Members of a project working together
//!
//! Teams are handed to external services; no storage engine persists them.

use serde::{Deserialize, Serialize};

use super::{Member, User};

/// A team within a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Identifier (for directories, the numeric group id)
    pub id: String,
    /// Team name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Team lead
    pub lead: Option<User>,
    /// Team members
    pub members: Vec<Member>,
}

impl Team {
    /// Create an empty team.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Users among the direct members, in order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.members.iter().filter_map(|m| match m {
            Member::User(user) => Some(user),
            Member::Group(_) => None,
        })
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team: {}, ID: {}", self.name, self.id)?;
        if let Some(lead) = &self.lead {
            write!(f, ", Lead: {}", lead.username)?;
        }
        Ok(())
    }
}
