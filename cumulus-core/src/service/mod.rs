//! Service - External systems that receive user and team lifecycle events
//!
//! TigerStyle: One contract, one working adapter, placeholders for the rest.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 Project::provision_user              │
//! └──────────────────────────────────────────────────────┘
//!                          │ fan-out
//!        ┌─────────────────┼──────────────────┐
//!        ▼                 ▼                  ▼
//!  ┌────────────┐   ┌─────────────┐   ┌──────────────┐
//!  │LdapService │   │SlackService │   │ ... (no-op)  │
//!  │ dial, bind,│   │  (no-op)    │   │              │
//!  │ op, unbind │   └─────────────┘   └──────────────┘
//!  └────────────┘
//! ```

mod ldap;
mod placeholder;

use std::fmt::Display;

use async_trait::async_trait;

use crate::types::{Team, User};

pub use self::ldap::{DirectoryConnection, LdapConfig, LdapService};
pub use placeholder::{AwsService, GitlabService, KubernetesService, OpenVpnService, SlackService};

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors returned by service adapters.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The service could not be reached
    #[error("connection error: {0}")]
    Connection(String),

    /// The service refused the adapter's credentials
    #[error("bind failed: {0}")]
    Bind(String),

    /// The service rejected the request
    #[error("operation failed: {0}")]
    Operation(String),

    /// The named user or team does not exist on the service
    #[error("not found: {0}")]
    NotFound(String),

    /// A user's password was rejected
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The adapter cannot perform this operation
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

/// An identity-consuming system kept in step with users and teams.
///
/// `Display` gives a short label for logs.
#[async_trait]
pub trait Service: Display + Send + Sync {
    /// Provision `user`.
    async fn add_user(&self, user: &User) -> ServiceResult<()>;

    /// Deprovision `user`.
    async fn remove_user(&self, user: &User) -> ServiceResult<()>;

    /// Users currently known to the service.
    async fn get_users(&self) -> ServiceResult<Vec<User>>;

    /// Provision `team`.
    async fn add_team(&self, team: &Team) -> ServiceResult<()>;

    /// Deprovision `team`.
    async fn remove_team(&self, team: &Team) -> ServiceResult<()>;

    /// Teams currently known to the service.
    async fn get_teams(&self) -> ServiceResult<Vec<Team>>;

    /// Instance identifier.
    fn id(&self) -> &str;

    /// Adapter kind, e.g. `ldap` or `slack`.
    fn kind(&self) -> &str;
}
