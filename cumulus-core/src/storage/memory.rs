//! MemoryBackend - Process-local storage
//!
//! TigerStyle: One lock, three maps, every access goes through the lock.
//!
//! Lookups by username, email or name scan the map; with duplicates the first
//! hit wins and iteration order is unspecified.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::backend::{GroupStorage, SessionStorage, UserStorage};
use super::error::{StorageError, StorageResult};
use super::factory::impl_storage_factory;
use crate::types::{Group, Member, Session, User};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<String, User>,
    groups: HashMap<String, Group>,
    sessions: HashMap<String, Session>,
}

/// In-memory storage engine.
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryBackend {
    /// Create an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl_storage_factory!(MemoryBackend);

// =============================================================================
// UserStorage
// =============================================================================

#[async_trait]
impl UserStorage for MemoryBackend {
    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn create_user(&self, user: &User) -> StorageResult<()> {
        let mut state = self.state.write().await;
        if state.users.contains_key(&user.id) {
            return Err(StorageError::UserAlreadyExists);
        }
        state.users.insert(user.id.clone(), user.clone());
        tracing::debug!(user_id = %user.id, "created user");
        Ok(())
    }

    async fn get_user_by_id(&self, id: &str) -> StorageResult<User> {
        let state = self.state.read().await;
        state.users.get(id).cloned().ok_or(StorageError::UserNotFound)
    }

    async fn get_user_by_email(&self, email: &str) -> StorageResult<User> {
        let state = self.state.read().await;
        state
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StorageError::EmailNotFound)
    }

    async fn get_user_by_username(&self, username: &str) -> StorageResult<User> {
        let state = self.state.read().await;
        state
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(StorageError::UsernameNotFound)
    }

    async fn update_user(&self, user: &User) -> StorageResult<()> {
        let mut state = self.state.write().await;
        let stored = state.users.get_mut(&user.id).ok_or(StorageError::UserNotFound)?;
        *stored = user.clone();
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> StorageResult<()> {
        let mut state = self.state.write().await;
        state.users.remove(id).ok_or(StorageError::UserNotFound)?;
        tracing::debug!(user_id = %id, "deleted user");
        Ok(())
    }
}

// =============================================================================
// GroupStorage
// =============================================================================

#[async_trait]
impl GroupStorage for MemoryBackend {
    async fn create_group(&self, group: &Group) -> StorageResult<()> {
        let mut state = self.state.write().await;
        if state.groups.contains_key(&group.id) {
            return Err(StorageError::GroupAlreadyExists);
        }
        state.groups.insert(group.id.clone(), group.clone());
        tracing::debug!(group_id = %group.id, members = group.members.len(), "created group");
        Ok(())
    }

    async fn get_group_by_id(&self, id: &str) -> StorageResult<Group> {
        let state = self.state.read().await;
        state.groups.get(id).cloned().ok_or(StorageError::GroupNotFound)
    }

    async fn get_group_by_name(&self, name: &str) -> StorageResult<Group> {
        let state = self.state.read().await;
        state
            .groups
            .values()
            .find(|g| g.name == name)
            .cloned()
            .ok_or(StorageError::GroupNotFound)
    }

    async fn update_group(&self, group: &Group) -> StorageResult<()> {
        let mut state = self.state.write().await;
        let stored = state.groups.get_mut(&group.id).ok_or(StorageError::GroupNotFound)?;
        *stored = group.clone();
        Ok(())
    }

    async fn delete_group(&self, id: &str) -> StorageResult<()> {
        let mut state = self.state.write().await;
        state.groups.remove(id).ok_or(StorageError::GroupNotFound)?;
        tracing::debug!(group_id = %id, "deleted group");
        Ok(())
    }

    async fn add_member_to_group(&self, member: &Member, group_id: &str) -> StorageResult<()> {
        let mut state = self.state.write().await;
        let group = state.groups.get_mut(group_id).ok_or(StorageError::GroupNotFound)?;
        // No duplicate check: adding twice yields two entries.
        group.members.push(member.clone());
        tracing::debug!(group_id, member = %member.member_ref(), "added member");
        Ok(())
    }

    async fn remove_member_from_group(
        &self,
        member: &Member,
        group_id: &str,
    ) -> StorageResult<()> {
        let mut state = self.state.write().await;
        let group = state.groups.get_mut(group_id).ok_or(StorageError::GroupNotFound)?;

        let position = group
            .members
            .iter()
            .position(|m| m.kind() == member.kind() && m.id() == member.id())
            .ok_or(StorageError::MemberNotFound)?;

        // `Vec::remove` keeps the order of the remaining members.
        group.members.remove(position);
        tracing::debug!(group_id, member = %member.member_ref(), "removed member");
        Ok(())
    }
}

// =============================================================================
// SessionStorage
// =============================================================================

#[async_trait]
impl SessionStorage for MemoryBackend {
    async fn create_session(&self, session: &Session) -> StorageResult<()> {
        let mut state = self.state.write().await;
        if state.sessions.contains_key(&session.id) {
            return Err(StorageError::SessionAlreadyExists);
        }
        state.sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn get_session_by_id(&self, id: &str) -> StorageResult<Session> {
        let state = self.state.read().await;
        state.sessions.get(id).cloned().ok_or(StorageError::SessionNotFound)
    }

    async fn get_session_by_user_id(&self, user_id: &str) -> StorageResult<Session> {
        let state = self.state.read().await;
        state
            .sessions
            .values()
            .find(|s| s.user_id == user_id)
            .cloned()
            .ok_or(StorageError::SessionNotFound)
    }

    async fn update_session(&self, session: &Session) -> StorageResult<()> {
        let mut state = self.state.write().await;
        let stored = state
            .sessions
            .get_mut(&session.id)
            .ok_or(StorageError::SessionNotFound)?;
        *stored = session.clone();
        Ok(())
    }

    async fn delete_session(&self, id: &str) -> StorageResult<()> {
        let mut state = self.state.write().await;
        state.sessions.remove(id).ok_or(StorageError::SessionNotFound)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
