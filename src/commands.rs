//! Subcommands
//!
//! Single operations against the selected engine. Useful with the persistent
//! engines; against `memory` every invocation starts empty.

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::{Args, Subcommand};
use cumulus_core::storage::{GroupStorage, SessionStorage, Storage, UserStorage};
use cumulus_core::types::{Group, Member, Session, User};

/// Default lifetime of sessions created from the command line.
pub const SESSION_TTL_SECONDS_DEFAULT: i64 = 3600;

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the demonstration sequence (default)
    Demo,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommand,
    },
    /// Manage groups and their members
    Group {
        #[command(subcommand)]
        action: GroupCommand,
    },
    /// Manage sessions
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user
    Create {
        /// Username
        username: String,
        /// Email address
        email: String,
        /// Id; a UUID is generated when omitted
        #[arg(long)]
        id: Option<String>,
        /// Password
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Show a user
    Get(UserLookup),
    /// Replace every field of a user
    Update {
        /// Id of the user to replace
        id: String,
        /// New username
        username: String,
        /// New email address
        email: String,
        /// New password; cleared when omitted
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Delete a user
    Delete {
        /// User id
        id: String,
    },
}

/// Exactly one way of finding a user.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct UserLookup {
    /// By id
    #[arg(long)]
    pub id: Option<String>,
    /// By username
    #[arg(long)]
    pub username: Option<String>,
    /// By email
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// Create an empty group
    Create {
        /// Group name
        name: String,
        /// Id; a UUID is generated when omitted
        #[arg(long)]
        id: Option<String>,
        /// Description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show a group and its members
    Get(GroupLookup),
    /// Delete a group
    Delete {
        /// Group id
        id: String,
    },
    /// Add a user or group to a group
    AddMember(MemberArgs),
    /// Remove a user or group from a group
    RemoveMember(MemberArgs),
}

/// Exactly one way of finding a group.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct GroupLookup {
    /// By id
    #[arg(long)]
    pub id: Option<String>,
    /// By name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct MemberArgs {
    /// Target group id
    pub group_id: String,
    #[command(flatten)]
    pub member: MemberLookup,
}

/// The member, by kind.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct MemberLookup {
    /// Id of a user member
    #[arg(long)]
    pub user: Option<String>,
    /// Id of a group member
    #[arg(long)]
    pub group: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Open a session for a user
    Create {
        /// Owning user id
        user_id: String,
        /// Lifetime in seconds
        #[arg(long, default_value_t = SESSION_TTL_SECONDS_DEFAULT)]
        ttl_seconds: i64,
    },
    /// Show a session
    Get {
        /// Session id
        #[arg(long, required_unless_present = "user_id", conflicts_with = "user_id")]
        id: Option<String>,
        /// Owning user id
        #[arg(long)]
        user_id: Option<String>,
    },
    /// Fail unless the session exists and has not expired
    Check {
        /// Session id
        id: String,
    },
    /// Delete a session
    Delete {
        /// Session id
        id: String,
    },
}

// =============================================================================
// Dispatch
// =============================================================================

/// Execute one subcommand.
///
/// # Errors
/// Returns the storage failure, with the operation as context.
pub async fn run(command: Command, storage: &Storage) -> anyhow::Result<()> {
    match command {
        Command::Demo => crate::demo::run(storage).await,
        Command::User { action } => run_user(action, storage).await,
        Command::Group { action } => run_group(action, storage).await,
        Command::Session { action } => run_session(action, storage).await,
    }
}

async fn run_user(action: UserCommand, storage: &Storage) -> anyhow::Result<()> {
    match action {
        UserCommand::Create {
            username,
            email,
            id,
            password,
        } => {
            let mut builder = User::builder(username, email).with_password(password);
            if let Some(id) = id {
                builder = builder.with_id(id);
            }
            let user = builder.build();
            storage
                .create_user(&user)
                .await
                .context("failed to create user")?;
            println!("{user}");
        }
        UserCommand::Get(lookup) => {
            let user = match (lookup.id, lookup.username, lookup.email) {
                (Some(id), _, _) => storage.get_user_by_id(&id).await,
                (_, Some(username), _) => storage.get_user_by_username(&username).await,
                (_, _, Some(email)) => storage.get_user_by_email(&email).await,
                (None, None, None) => anyhow::bail!("one of --id, --username or --email is required"),
            }
            .context("failed to get user")?;
            println!("{user}");
        }
        UserCommand::Update {
            id,
            username,
            email,
            password,
        } => {
            let user = User::builder(username, email)
                .with_id(id)
                .with_password(password)
                .build();
            storage
                .update_user(&user)
                .await
                .context("failed to update user")?;
            println!("{user}");
        }
        UserCommand::Delete { id } => {
            storage
                .delete_user(&id)
                .await
                .context("failed to delete user")?;
            println!("Deleted user {id}");
        }
    }
    Ok(())
}

async fn run_group(action: GroupCommand, storage: &Storage) -> anyhow::Result<()> {
    match action {
        GroupCommand::Create {
            name,
            id,
            description,
        } => {
            let mut builder = Group::builder(name).with_description(description);
            if let Some(id) = id {
                builder = builder.with_id(id);
            }
            let group = builder.build();
            storage
                .create_group(&group)
                .await
                .context("failed to create group")?;
            print!("{group}");
        }
        GroupCommand::Get(lookup) => {
            let group = match (lookup.id, lookup.name) {
                (Some(id), _) => storage.get_group_by_id(&id).await,
                (_, Some(name)) => storage.get_group_by_name(&name).await,
                (None, None) => anyhow::bail!("one of --id or --name is required"),
            }
            .context("failed to get group")?;
            print!("{group}");
        }
        GroupCommand::Delete { id } => {
            storage
                .delete_group(&id)
                .await
                .context("failed to delete group")?;
            println!("Deleted group {id}");
        }
        GroupCommand::AddMember(args) => {
            let member = resolve_member(storage, args.member).await?;
            storage
                .add_member_to_group(&member, &args.group_id)
                .await
                .with_context(|| format!("failed to add {} to {}", member.id(), args.group_id))?;
            println!("Added {} to {}", member.member_ref(), args.group_id);
        }
        GroupCommand::RemoveMember(args) => {
            let member = resolve_member(storage, args.member).await?;
            storage
                .remove_member_from_group(&member, &args.group_id)
                .await
                .with_context(|| {
                    format!("failed to remove {} from {}", member.id(), args.group_id)
                })?;
            println!("Removed {} from {}", member.member_ref(), args.group_id);
        }
    }
    Ok(())
}

async fn resolve_member(storage: &Storage, lookup: MemberLookup) -> anyhow::Result<Member> {
    match (lookup.user, lookup.group) {
        (Some(id), _) => Ok(Member::User(
            storage
                .get_user_by_id(&id)
                .await
                .with_context(|| format!("failed to get user {id}"))?,
        )),
        (_, Some(id)) => Ok(Member::Group(
            storage
                .get_group_by_id(&id)
                .await
                .with_context(|| format!("failed to get group {id}"))?,
        )),
        (None, None) => anyhow::bail!("one of --user or --group is required"),
    }
}

async fn run_session(action: SessionCommand, storage: &Storage) -> anyhow::Result<()> {
    match action {
        SessionCommand::Create {
            user_id,
            ttl_seconds,
        } => {
            anyhow::ensure!(ttl_seconds > 0, "--ttl-seconds must be positive");
            let session = Session::with_ttl(user_id, Duration::seconds(ttl_seconds));
            storage
                .create_session(&session)
                .await
                .context("failed to create session")?;
            println!("{session}");
        }
        SessionCommand::Get { id, user_id } => {
            let session = match (id, user_id) {
                (Some(id), _) => storage.get_session_by_id(&id).await,
                (_, Some(user_id)) => storage.get_session_by_user_id(&user_id).await,
                (None, None) => anyhow::bail!("one of --id or --user-id is required"),
            }
            .context("failed to get session")?;
            println!("{session}");
        }
        SessionCommand::Check { id } => {
            let session = storage
                .get_session_by_id(&id)
                .await
                .context("failed to get session")?;
            session
                .ensure_active(Utc::now())
                .with_context(|| format!("session {id} is not active"))?;
            println!("{session}");
        }
        SessionCommand::Delete { id } => {
            storage
                .delete_session(&id)
                .await
                .context("failed to delete session")?;
            println!("Deleted session {id}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cumulus_core::storage::{MemoryBackend, StorageError};

    fn storage() -> Storage {
        Storage::new(&MemoryBackend::new()).unwrap()
    }

    #[tokio::test]
    async fn test_user_commands() {
        let storage = storage();

        run_user(
            UserCommand::Create {
                username: "alice".into(),
                email: "alice@example.com".into(),
                id: Some("u1".into()),
                password: "pw".into(),
            },
            &storage,
        )
        .await
        .unwrap();

        run_user(
            UserCommand::Update {
                id: "u1".into(),
                username: "alice".into(),
                email: "alice@corp.example.com".into(),
                password: String::new(),
            },
            &storage,
        )
        .await
        .unwrap();

        let user = storage.get_user_by_id("u1").await.unwrap();
        assert_eq!(user.email, "alice@corp.example.com");
        assert!(user.password.is_empty());

        run_user(UserCommand::Delete { id: "u1".into() }, &storage)
            .await
            .unwrap();
        let err = run_user(UserCommand::Delete { id: "u1".into() }, &storage)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_member_commands() {
        let storage = storage();
        storage
            .create_user(&User::builder("bob", "bob@example.com").with_id("u2").build())
            .await
            .unwrap();
        storage
            .create_group(&Group::builder("ops").with_id("g1").build())
            .await
            .unwrap();

        let add = MemberArgs {
            group_id: "g1".into(),
            member: MemberLookup {
                user: Some("u2".into()),
                group: None,
            },
        };
        run_group(GroupCommand::AddMember(add), &storage).await.unwrap();
        assert_eq!(storage.get_group_by_id("g1").await.unwrap().members.len(), 1);

        let remove = MemberArgs {
            group_id: "g1".into(),
            member: MemberLookup {
                user: Some("u2".into()),
                group: None,
            },
        };
        run_group(GroupCommand::RemoveMember(remove), &storage)
            .await
            .unwrap();
        assert!(storage.get_group_by_id("g1").await.unwrap().members.is_empty());
    }

    #[tokio::test]
    async fn test_session_check_rejects_expired() {
        let storage = storage();
        let expired = Session::new("u1", Utc::now() - Duration::seconds(1)).with_id("s1");
        storage.create_session(&expired).await.unwrap();

        let err = run_session(SessionCommand::Check { id: "s1".into() }, &storage)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::SessionExpired)
        ));
    }
}
