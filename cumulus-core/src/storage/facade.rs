//! Storage - The facade handed to callers
//!
//! Pure delegation: every call is forwarded unchanged to the handle obtained
//! from the engine's factory.

use std::sync::Arc;

use async_trait::async_trait;

use super::backend::{GroupStorage, SessionStorage, UserStorage};
use super::error::StorageResult;
use super::factory::{StorageConfig, StorageFactory};
use super::memory::MemoryBackend;
use crate::types::{Group, Member, Session, User};

#[cfg(feature = "postgres")]
use super::postgres::PostgresBackend;
#[cfg(feature = "redis")]
use super::redis::RedisBackend;

/// Users, groups and sessions behind one value.
#[derive(Clone)]
pub struct Storage {
    users: Arc<dyn UserStorage>,
    groups: Arc<dyn GroupStorage>,
    sessions: Arc<dyn SessionStorage>,
}

impl Storage {
    /// Compose a facade from the engine's three capability handles.
    ///
    /// # Errors
    /// Returns the first factory failure; nothing is returned half-built.
    pub fn new(factory: &dyn StorageFactory) -> StorageResult<Self> {
        let users = factory.new_user_storage()?;
        let groups = factory.new_group_storage()?;
        let sessions = factory.new_session_storage()?;

        Ok(Self {
            users,
            groups,
            sessions,
        })
    }

    /// Open the engine described by `config` and wrap it.
    ///
    /// # Errors
    /// Returns an error if the engine cannot be opened.
    pub async fn connect(config: &StorageConfig) -> StorageResult<Self> {
        tracing::info!(engine = config.engine_name(), "opening storage");

        match config {
            StorageConfig::Memory => Self::new(&MemoryBackend::new()),
            #[cfg(feature = "postgres")]
            StorageConfig::Postgres(pg) => Self::new(&PostgresBackend::connect(pg).await?),
            #[cfg(feature = "redis")]
            StorageConfig::Redis(redis) => Self::new(&RedisBackend::connect(redis).await?),
        }
    }
}

#[async_trait]
impl UserStorage for Storage {
    async fn close(&self) -> StorageResult<()> {
        self.users.close().await
    }

    async fn create_user(&self, user: &User) -> StorageResult<()> {
        self.users.create_user(user).await
    }

    async fn get_user_by_id(&self, id: &str) -> StorageResult<User> {
        self.users.get_user_by_id(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> StorageResult<User> {
        self.users.get_user_by_email(email).await
    }

    async fn get_user_by_username(&self, username: &str) -> StorageResult<User> {
        self.users.get_user_by_username(username).await
    }

    async fn update_user(&self, user: &User) -> StorageResult<()> {
        self.users.update_user(user).await
    }

    async fn delete_user(&self, id: &str) -> StorageResult<()> {
        self.users.delete_user(id).await
    }
}

#[async_trait]
impl GroupStorage for Storage {
    async fn create_group(&self, group: &Group) -> StorageResult<()> {
        self.groups.create_group(group).await
    }

    async fn get_group_by_id(&self, id: &str) -> StorageResult<Group> {
        self.groups.get_group_by_id(id).await
    }

    async fn get_group_by_name(&self, name: &str) -> StorageResult<Group> {
        self.groups.get_group_by_name(name).await
    }

    async fn update_group(&self, group: &Group) -> StorageResult<()> {
        self.groups.update_group(group).await
    }

    async fn delete_group(&self, id: &str) -> StorageResult<()> {
        self.groups.delete_group(id).await
    }

    async fn add_member_to_group(&self, member: &Member, group_id: &str) -> StorageResult<()> {
        self.groups.add_member_to_group(member, group_id).await
    }

    async fn remove_member_from_group(
        &self,
        member: &Member,
        group_id: &str,
    ) -> StorageResult<()> {
        self.groups.remove_member_from_group(member, group_id).await
    }
}

#[async_trait]
impl SessionStorage for Storage {
    async fn create_session(&self, session: &Session) -> StorageResult<()> {
        self.sessions.create_session(session).await
    }

    async fn get_session_by_id(&self, id: &str) -> StorageResult<Session> {
        self.sessions.get_session_by_id(id).await
    }

    async fn get_session_by_user_id(&self, user_id: &str) -> StorageResult<Session> {
        self.sessions.get_session_by_user_id(user_id).await
    }

    async fn update_session(&self, session: &Session) -> StorageResult<()> {
        self.sessions.update_session(session).await
    }

    async fn delete_session(&self, id: &str) -> StorageResult<()> {
        self.sessions.delete_session(id).await
    }
}

// =============================================================================
// Tests
// =============================================================================
