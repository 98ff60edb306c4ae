//! Storage factory and engine selection
//!
//! Engines hand out the three capability handles through [`StorageFactory`];
//! [`StorageConfig`] names which engine to open and with what parameters.

use std::sync::Arc;

use super::backend::{GroupStorage, SessionStorage, UserStorage};
use super::error::StorageResult;

#[cfg(feature = "postgres")]
use super::postgres::PostgresConfig;
#[cfg(feature = "redis")]
use super::redis::RedisConfig;

/// Produces the per-capability handles of one engine.
pub trait StorageFactory {
    /// Handle for user operations.
    ///
    /// # Errors
    /// Engine-specific failure to produce the handle.
    fn new_user_storage(&self) -> StorageResult<Arc<dyn UserStorage>>;

    /// Handle for group operations.
    ///
    /// # Errors
    /// Engine-specific failure to produce the handle.
    fn new_group_storage(&self) -> StorageResult<Arc<dyn GroupStorage>>;

    /// Handle for session operations.
    ///
    /// # Errors
    /// Engine-specific failure to produce the handle.
    fn new_session_storage(&self) -> StorageResult<Arc<dyn SessionStorage>>;
}

/// Implements [`StorageFactory`] for an engine that is a cheap-to-clone handle
/// implementing all three storage traits.
macro_rules! impl_storage_factory {
    ($engine:ty) => {
        impl $crate::storage::StorageFactory for $engine {
            fn new_user_storage(
                &self,
            ) -> $crate::storage::StorageResult<::std::sync::Arc<dyn $crate::storage::UserStorage>>
            {
                Ok(::std::sync::Arc::new(self.clone()))
            }

            fn new_group_storage(
                &self,
            ) -> $crate::storage::StorageResult<::std::sync::Arc<dyn $crate::storage::GroupStorage>>
            {
                Ok(::std::sync::Arc::new(self.clone()))
            }

            fn new_session_storage(
                &self,
            ) -> $crate::storage::StorageResult<
                ::std::sync::Arc<dyn $crate::storage::SessionStorage>,
            > {
                Ok(::std::sync::Arc::new(self.clone()))
            }
        }
    };
}

pub(crate) use impl_storage_factory;

/// Which engine to open, with its parameters.
#[derive(Debug, Clone, Default)]
pub enum StorageConfig {
    /// Process-local maps
    #[default]
    Memory,
    /// PostgreSQL
    #[cfg(feature = "postgres")]
    Postgres(PostgresConfig),
    /// Redis
    #[cfg(feature = "redis")]
    Redis(RedisConfig),
}

impl StorageConfig {
    /// Short engine name for logs.
    #[must_use]
    pub fn engine_name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => "postgres",
            #[cfg(feature = "redis")]
            Self::Redis(_) => "redis",
        }
    }
}
