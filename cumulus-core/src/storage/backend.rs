//! Storage traits implemented by every engine.

use async_trait::async_trait;

use super::error::StorageResult;
use crate::types::{Group, Member, Session, User};

/// Storage for users.
///
/// `close` lives here because every engine hands out the same underlying
/// handle for all three capabilities; closing it through any one of them
/// releases the engine.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Release the engine's resources.
    async fn close(&self) -> StorageResult<()>;

    /// Insert a user; fails with `UserAlreadyExists` on a duplicate.
    async fn create_user(&self, user: &User) -> StorageResult<()>;

    /// Fetch a user by id.
    async fn get_user_by_id(&self, id: &str) -> StorageResult<User>;

    /// Fetch a user by email.
    async fn get_user_by_email(&self, email: &str) -> StorageResult<User>;

    /// Fetch a user by username.
    async fn get_user_by_username(&self, username: &str) -> StorageResult<User>;

    /// Replace every field of an existing user.
    async fn update_user(&self, user: &User) -> StorageResult<()>;

    /// Remove a user by id.
    async fn delete_user(&self, id: &str) -> StorageResult<()>;
}

/// Storage for groups and their membership.
#[async_trait]
pub trait GroupStorage: Send + Sync {
    /// Insert a group together with its members.
    async fn create_group(&self, group: &Group) -> StorageResult<()>;

    /// Fetch a group by id, members included.
    async fn get_group_by_id(&self, id: &str) -> StorageResult<Group>;

    /// Fetch a group by name, members included.
    async fn get_group_by_name(&self, name: &str) -> StorageResult<Group>;

    /// Replace a group, including its full membership.
    async fn update_group(&self, group: &Group) -> StorageResult<()>;

    /// Remove a group by id.
    async fn delete_group(&self, id: &str) -> StorageResult<()>;

    /// Append `member` to the group `group_id`.
    async fn add_member_to_group(&self, member: &Member, group_id: &str) -> StorageResult<()>;

    /// Remove `member` from the group `group_id`.
    async fn remove_member_from_group(&self, member: &Member, group_id: &str)
        -> StorageResult<()>;
}

/// Storage for sessions.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Insert a session; fails with `SessionAlreadyExists` on a duplicate.
    async fn create_session(&self, session: &Session) -> StorageResult<()>;

    /// Fetch a session by id.
    async fn get_session_by_id(&self, id: &str) -> StorageResult<Session>;

    /// Fetch a session belonging to `user_id`.
    async fn get_session_by_user_id(&self, user_id: &str) -> StorageResult<Session>;

    /// Replace an existing session.
    async fn update_session(&self, session: &Session) -> StorageResult<()>;

    /// Remove a session by id.
    async fn delete_session(&self, id: &str) -> StorageResult<()>;
}
