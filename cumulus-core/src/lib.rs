//! Cumulus Core - Users, Groups and Sessions
//!
//! TigerStyle: Storage abstractions with interchangeable engines.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  Storage                     │
//! │   (facade over user/group/session traits)    │
//! ├───────────────┬───────────────┬─────────────┤
//! │ MemoryBackend │PostgresBackend│ RedisBackend│
//! │  (RwLock maps)│ (sqlx, tx)    │ (JSON/key)  │
//! ├───────────────┴───────────────┴─────────────┤
//! │  Service adapters (LDAP, placeholders)       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use cumulus_core::storage::{MemoryBackend, Storage, UserStorage};
//! use cumulus_core::types::User;
//!
//! # tokio_test::block_on(async {
//! let storage = Storage::new(&MemoryBackend::new()).unwrap();
//! let user = User::builder("johndoe", "john@example.com").with_id("user1").build();
//! storage.create_user(&user).await.unwrap();
//! assert_eq!(storage.get_user_by_id("user1").await.unwrap(), user);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod constants;
pub mod service;
pub mod storage;
pub mod types;

// Re-export common types
pub use constants::*;
pub use service::{Service, ServiceError, ServiceResult};
pub use storage::{
    GroupStorage, SessionStorage, Storage, StorageConfig, StorageError, StorageFactory,
    StorageResult, UserStorage,
};
pub use types::{Group, Member, MemberKind, MemberRef, Project, Session, Team, User};
