//! RedisBackend - Key-value storage
//!
//! TigerStyle: One JSON record per id key, nothing else.
//!
//! Users, groups and sessions share one key space: each record is stored under
//! its bare id. There are no secondary indexes, so lookups by username, email,
//! group name or session owner always report "not found", and membership
//! operations leave the stored group untouched.

use ::redis::aio::ConnectionManager;
use ::redis::AsyncCommands;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::backend::{GroupStorage, SessionStorage, UserStorage};
use super::error::{StorageError, StorageResult};
use super::factory::impl_storage_factory;
use crate::constants::REDIS_PORT_DEFAULT;
use crate::types::{Group, Member, Session, User};

// =============================================================================
// Configuration
// =============================================================================

/// Connection parameters for [`RedisBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// AUTH password, if the server requires one
    pub password: Option<String>,
    /// Logical database index
    pub db: i64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: REDIS_PORT_DEFAULT,
            password: None,
            db: 0,
        }
    }
}

impl RedisConfig {
    /// Connection URL in `redis://[:password@]host:port/db` form.
    #[must_use]
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) if !password.is_empty() => {
                format!("redis://:{password}@{}:{}/{}", self.host, self.port, self.db)
            }
            _ => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }
}

// =============================================================================
// RedisBackend
// =============================================================================

/// Redis storage engine.
///
/// The connection manager multiplexes one connection and reconnects on its
/// own; each operation works on a clone of it.
#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBackend").finish_non_exhaustive()
    }
}

impl RedisBackend {
    /// Connect using a `redis://` URL.
    ///
    /// # Errors
    /// Returns `Connection` if the URL is invalid or the server unreachable.
    pub async fn new(redis_url: &str) -> StorageResult<Self> {
        assert!(!redis_url.is_empty(), "redis url cannot be empty");

        let client = ::redis::Client::open(redis_url)
            .map_err(|e| StorageError::connection(format!("failed to create redis client: {e}")))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| StorageError::connection(format!("failed to connect to redis: {e}")))?;

        tracing::debug!("redis storage initialized");
        Ok(Self { conn })
    }

    /// Connect with discrete parameters.
    ///
    /// # Errors
    /// Returns `Connection` if the server is unreachable.
    pub async fn connect(config: &RedisConfig) -> StorageResult<Self> {
        let backend = Self::new(&config.url()).await?;
        tracing::info!(host = %config.host, port = config.port, db = config.db, "connected to redis");
        Ok(backend)
    }

    async fn insert<T: Serialize>(
        &self,
        key: &str,
        record: &T,
        duplicate: StorageError,
    ) -> StorageResult<()> {
        let json = serde_json::to_string(record)?;
        let mut conn = self.conn.clone();

        let created: bool = conn.set_nx(key, json).await.map_err(redis_error)?;
        if !created {
            return Err(duplicate);
        }
        Ok(())
    }

    async fn replace<T: Serialize>(
        &self,
        key: &str,
        record: &T,
        missing: StorageError,
    ) -> StorageResult<()> {
        let json = serde_json::to_string(record)?;
        let mut conn = self.conn.clone();

        // SET .. XX replies nil when the key does not exist.
        let reply: Option<String> = ::redis::cmd("SET")
            .arg(key)
            .arg(json)
            .arg("XX")
            .query_async(&mut conn)
            .await
            .map_err(redis_error)?;

        if reply.is_none() {
            return Err(missing);
        }
        Ok(())
    }

    async fn fetch<T: DeserializeOwned>(&self, key: &str, missing: StorageError) -> StorageResult<T> {
        let mut conn = self.conn.clone();

        let json: Option<String> = conn.get(key).await.map_err(redis_error)?;
        match json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Err(missing),
        }
    }

    async fn remove(&self, key: &str, missing: StorageError) -> StorageResult<()> {
        let mut conn = self.conn.clone();

        let removed: i64 = conn.del(key).await.map_err(redis_error)?;
        if removed == 0 {
            return Err(missing);
        }
        Ok(())
    }
}

impl_storage_factory!(RedisBackend);

fn redis_error(e: ::redis::RedisError) -> StorageError {
    if e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() {
        StorageError::connection(e.to_string())
    } else {
        StorageError::backend(e.to_string())
    }
}

// =============================================================================
// UserStorage
// =============================================================================

#[async_trait]
impl UserStorage for RedisBackend {
    async fn close(&self) -> StorageResult<()> {
        // The manager's connection is released when the last clone drops.
        Ok(())
    }

    async fn create_user(&self, user: &User) -> StorageResult<()> {
        self.insert(&user.id, user, StorageError::UserAlreadyExists).await?;
        tracing::debug!(user_id = %user.id, "created user");
        Ok(())
    }

    async fn get_user_by_id(&self, id: &str) -> StorageResult<User> {
        self.fetch(id, StorageError::UserNotFound).await
    }

    async fn get_user_by_email(&self, _email: &str) -> StorageResult<User> {
        Err(StorageError::EmailNotFound)
    }

    async fn get_user_by_username(&self, _username: &str) -> StorageResult<User> {
        Err(StorageError::UsernameNotFound)
    }

    async fn update_user(&self, user: &User) -> StorageResult<()> {
        self.replace(&user.id, user, StorageError::UserNotFound).await
    }

    async fn delete_user(&self, id: &str) -> StorageResult<()> {
        self.remove(id, StorageError::UserNotFound).await?;
        tracing::debug!(user_id = %id, "deleted user");
        Ok(())
    }
}

// =============================================================================
// GroupStorage
// =============================================================================

#[async_trait]
impl GroupStorage for RedisBackend {
    async fn create_group(&self, group: &Group) -> StorageResult<()> {
        self.insert(&group.id, group, StorageError::GroupAlreadyExists).await?;
        tracing::debug!(group_id = %group.id, "created group");
        Ok(())
    }

    async fn get_group_by_id(&self, id: &str) -> StorageResult<Group> {
        self.fetch(id, StorageError::GroupNotFound).await
    }

    async fn get_group_by_name(&self, _name: &str) -> StorageResult<Group> {
        Err(StorageError::GroupNotFound)
    }

    async fn update_group(&self, group: &Group) -> StorageResult<()> {
        self.replace(&group.id, group, StorageError::GroupNotFound).await
    }

    async fn delete_group(&self, id: &str) -> StorageResult<()> {
        self.remove(id, StorageError::GroupNotFound).await?;
        tracing::debug!(group_id = %id, "deleted group");
        Ok(())
    }

    async fn add_member_to_group(&self, member: &Member, group_id: &str) -> StorageResult<()> {
        tracing::debug!(group_id, member = %member.member_ref(), "membership not tracked by redis");
        Ok(())
    }

    async fn remove_member_from_group(
        &self,
        member: &Member,
        group_id: &str,
    ) -> StorageResult<()> {
        tracing::debug!(group_id, member = %member.member_ref(), "membership not tracked by redis");
        Ok(())
    }
}

// =============================================================================
// SessionStorage
// =============================================================================

#[async_trait]
impl SessionStorage for RedisBackend {
    async fn create_session(&self, session: &Session) -> StorageResult<()> {
        self.insert(&session.id, session, StorageError::SessionAlreadyExists).await
    }

    async fn get_session_by_id(&self, id: &str) -> StorageResult<Session> {
        self.fetch(id, StorageError::SessionNotFound).await
    }

    async fn get_session_by_user_id(&self, _user_id: &str) -> StorageResult<Session> {
        Err(StorageError::SessionNotFound)
    }

    async fn update_session(&self, session: &Session) -> StorageResult<()> {
        self.replace(&session.id, session, StorageError::SessionNotFound).await
    }

    async fn delete_session(&self, id: &str) -> StorageResult<()> {
        self.remove(id, StorageError::SessionNotFound).await
    }
}

// =============================================================================
// Tests (require running Redis)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::env;

    fn test_redis_url() -> Option<String> {
        env::var("TEST_REDIS_URL").ok()
    }

    /// Skip test if no server available.
    macro_rules! require_redis {
        () => {
            match test_redis_url() {
                Some(url) => url,
                None => {
                    eprintln!("Skipping test: TEST_REDIS_URL not set");
                    return;
                }
            }
        };
    }

    fn unique(prefix: &str) -> String {
        format!("{prefix}-{}", uuid::Uuid::new_v4())
    }

    #[test]
    fn test_config_url() {
        let config = RedisConfig::default();
        assert_eq!(config.url(), "redis://localhost:6379/0");

        let config = RedisConfig {
            host: "cache".to_string(),
            password: Some("secret".to_string()),
            db: 2,
            ..RedisConfig::default()
        };
        assert_eq!(config.url(), "redis://:secret@cache:6379/2");
    }

    #[tokio::test]
    async fn test_redis_user_crud() {
        let url = require_redis!();
        let backend = RedisBackend::new(&url).await.unwrap();

        let user = User::builder("johndoe", "john@example.com")
            .with_id(unique("user"))
            .build();

        backend.create_user(&user).await.unwrap();
        assert!(matches!(
            backend.create_user(&user).await,
            Err(StorageError::UserAlreadyExists)
        ));
        assert_eq!(backend.get_user_by_id(&user.id).await.unwrap(), user);

        let mut updated = user.clone();
        updated.email = "john.doe@example.com".to_string();
        backend.update_user(&updated).await.unwrap();
        assert_eq!(backend.get_user_by_id(&user.id).await.unwrap(), updated);

        backend.delete_user(&user.id).await.unwrap();
        assert!(matches!(
            backend.delete_user(&user.id).await,
            Err(StorageError::UserNotFound)
        ));
        assert!(matches!(
            backend.update_user(&updated).await,
            Err(StorageError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_redis_secondary_lookups_not_supported() {
        let url = require_redis!();
        let backend = RedisBackend::new(&url).await.unwrap();

        let user = User::builder("indexed", "indexed@example.com")
            .with_id(unique("user"))
            .build();
        backend.create_user(&user).await.unwrap();

        assert!(matches!(
            backend.get_user_by_username("indexed").await,
            Err(StorageError::UsernameNotFound)
        ));
        assert!(matches!(
            backend.get_user_by_email("indexed@example.com").await,
            Err(StorageError::EmailNotFound)
        ));

        backend.delete_user(&user.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_membership_is_a_noop() {
        let url = require_redis!();
        let backend = RedisBackend::new(&url).await.unwrap();

        let group = Group::builder("my-group").with_id(unique("group")).build();
        backend.create_group(&group).await.unwrap();

        let member = Member::from(User::builder("a", "a@example.com").build());
        backend.add_member_to_group(&member, &group.id).await.unwrap();
        assert!(backend.get_group_by_id(&group.id).await.unwrap().members.is_empty());

        backend.delete_group(&group.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_session_roundtrip() {
        let url = require_redis!();
        let backend = RedisBackend::new(&url).await.unwrap();

        let session = Session::with_ttl("user1", Duration::minutes(5)).with_id(unique("session"));
        backend.create_session(&session).await.unwrap();
        assert_eq!(backend.get_session_by_id(&session.id).await.unwrap(), session);
        assert!(matches!(
            backend.get_session_by_user_id("user1").await,
            Err(StorageError::SessionNotFound)
        ));

        backend.delete_session(&session.id).await.unwrap();
        assert!(matches!(
            backend.get_session_by_id(&session.id).await,
            Err(StorageError::SessionNotFound)
        ));
    }

    #[tokio::test]
    async fn test_redis_update_missing_records() {
        let url = require_redis!();
        let backend = RedisBackend::new(&url).await.unwrap();

        let mut group = Group::builder("my-group")
            .with_id(unique("group"))
            .with_description("before")
            .build();
        assert!(matches!(
            backend.update_group(&group).await,
            Err(StorageError::GroupNotFound)
        ));
        assert!(matches!(
            backend.get_group_by_id(&group.id).await,
            Err(StorageError::GroupNotFound)
        ));

        backend.create_group(&group).await.unwrap();
        group.description = "after".to_string();
        backend.update_group(&group).await.unwrap();
        assert_eq!(backend.get_group_by_id(&group.id).await.unwrap(), group);
        backend.delete_group(&group.id).await.unwrap();

        let session = Session::with_ttl("user1", Duration::minutes(5)).with_id(unique("session"));
        assert!(matches!(
            backend.update_session(&session).await,
            Err(StorageError::SessionNotFound)
        ));
        assert!(matches!(
            backend.get_session_by_id(&session.id).await,
            Err(StorageError::SessionNotFound)
        ));
    }
}
