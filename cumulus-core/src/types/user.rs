//! User - An account known to Cumulus

use serde::{Deserialize, Serialize};

// =============================================================================
// User
// =============================================================================

/// A user account.
///
/// `id`, `username` and `email` are each unique within an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Login name
    pub username: String,
    /// Contact address
    pub email: String,
    /// Credential as stored by the caller
    pub password: String,
}

impl User {
    /// Create a user with a generated UUID v4 id.
    ///
    /// # Panics
    /// Panics if `username` is empty.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::builder(username, email).with_password(password).build()
    }

    /// Create a builder for a user with the given username and email.
    #[must_use]
    pub fn builder(username: impl Into<String>, email: impl Into<String>) -> UserBuilder {
        UserBuilder::new(username.into(), email.into())
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "User: {}, ID: {}, Email: {}", self.username, self.id, self.email)
    }
}

// =============================================================================
// User Builder
// =============================================================================

/// Builder for [`User`].
#[derive(Debug)]
pub struct UserBuilder {
    id: Option<String>,
    username: String,
    email: String,
    password: String,
}

impl UserBuilder {
    fn new(username: String, email: String) -> Self {
        Self {
            id: None,
            username,
            email,
            password: String::new(),
        }
    }

    /// Set a custom id instead of a generated one.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Build the user.
    ///
    /// # Panics
    /// Panics if the username is empty.
    #[must_use]
    pub fn build(self) -> User {
        assert!(!self.username.is_empty(), "username cannot be empty");

        User {
            id: self.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            username: self.username,
            email: self.email,
            password: self.password,
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
    fn test_user_new_generates_id() {
        let a = User::new("alice", "alice@example.com", "secret");
        let b = User::new("alice", "alice@example.com", "secret");

        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert_eq!(a.password, "secret");
    }

    #[test]
    fn test_user_display_hides_password() {
        let user = User::builder("johndoe", "john@example.com")
            .with_id("user1")
            .with_password("password")
            .build();

        let shown = user.to_string();
        assert_eq!(shown, "User: johndoe, ID: user1, Email: john@example.com");
        assert!(!shown.contains("password"));
    }

    #[test]
    #[should_panic(expected = "username")]
    fn test_user_empty_username() {
        let _ = User::builder("", "nobody@example.com").build();
    }
}
