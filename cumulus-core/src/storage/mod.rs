//! Storage - Traits, Facade and Engines
//!
//! TigerStyle: Swap engines without touching callers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Storage (facade, delegation)                 │
//! │      UserStorage  +  GroupStorage  +  SessionStorage         │
//! └─────────────────────────────────────────────────────────────┘
//!          ↑                      ↑                      ↑
//!          │   StorageFactory     │                      │
//! ┌────────┴────────┐   ┌────────┴────────┐   ┌─────────┴───────┐
//! │  MemoryBackend  │   │ PostgresBackend │   │  RedisBackend   │
//! │ (RwLock, maps)  │   │ (sqlx, join tbl)│   │ (JSON per key)  │
//! └─────────────────┘   └─────────────────┘   └─────────────────┘
//! ```
//!
//! Each engine is authoritative only for itself; nothing keeps the in-memory
//! member lists and the relational join table in step.

mod backend;
mod error;
mod facade;
mod factory;
mod memory;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "redis")]
mod redis;

pub use backend::{GroupStorage, SessionStorage, UserStorage};
pub use error::{StorageError, StorageResult};
pub use facade::Storage;
pub use factory::{StorageConfig, StorageFactory};
pub use memory::MemoryBackend;

#[cfg(feature = "postgres")]
pub use postgres::{PostgresBackend, PostgresConfig};

#[cfg(feature = "redis")]
pub use self::redis::{RedisBackend, RedisConfig};
