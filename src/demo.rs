//! Demonstration run
//!
//! Walks the storage through a fixed sequence of user and group operations,
//! printing each record it reads back.

use anyhow::Context;
use cumulus_core::storage::{GroupStorage, StorageError, StorageResult, UserStorage};
use cumulus_core::types::{Group, Member, User};

/// Creating a record that is already there is reported and skipped.
fn tolerate_existing(result: StorageResult<()>, what: &str) -> anyhow::Result<()> {
    match result {
        Err(e) if e.is_already_exists() => {
            tracing::warn!(record = what, "already exists, continuing");
            Ok(())
        }
        other => other.with_context(|| format!("failed to create {what}")),
    }
}

/// Run the demonstration sequence against `storage`.
///
/// # Errors
/// Returns the first failure other than an "already exists" on create.
pub async fn run<S>(storage: &S) -> anyhow::Result<()>
where
    S: UserStorage + GroupStorage,
{
    let mut user = User::builder("johndoe", "john@example.com")
        .with_id("user1")
        .with_password("password")
        .build();
    tolerate_existing(storage.create_user(&user).await, "user1")?;

    let user2 = User::builder("johndoe2", "johndoe@example.com")
        .with_id("user2")
        .build();
    tolerate_existing(storage.create_user(&user2).await, "user2")?;

    let found = storage
        .get_user_by_id("user1")
        .await
        .context("failed to get user by id")?;
    println!("{found}");

    let found = storage
        .get_user_by_username("johndoe")
        .await
        .context("failed to get user by username")?;
    println!("{found}");

    let found = storage
        .get_user_by_email("john@example.com")
        .await
        .context("failed to get user by email")?;
    println!("{found}");

    user.email = "john.doe@example.com".to_string();
    storage
        .update_user(&user)
        .await
        .context("failed to update user")?;

    let found = storage
        .get_user_by_id("user1")
        .await
        .context("failed to get user by id after updating")?;
    println!("{found}");

    let mut group = Group::builder("my-group")
        .with_id("group1")
        .with_description("My group description")
        .build();
    storage
        .create_group(&group)
        .await
        .context("failed to create group1")?;

    let group2 = Group::builder("Developers").with_id("group2").build();
    tolerate_existing(storage.create_group(&group2).await, "group2")?;

    let found = storage
        .get_group_by_id("group1")
        .await
        .context("failed to get group by id")?;
    print!("{found}");

    let found = storage
        .get_group_by_name("my-group")
        .await
        .context("failed to get group by name")?;
    print!("{found}");

    group.description = "My updated group description".to_string();
    storage
        .update_group(&group)
        .await
        .context("failed to update group")?;

    let found = storage
        .get_group_by_id("group1")
        .await
        .context("failed to get group by id after updating")?;
    print!("Updated group: {found}");

    add_member(storage, Member::from(user.clone()), &group.id).await?;
    add_member(storage, Member::from(user2.clone()), &group2.id).await?;
    add_member(storage, Member::from(group2.clone()), &group.id).await?;

    storage
        .delete_user("user1")
        .await
        .context("failed to delete user")?;

    storage
        .delete_group(&group.id)
        .await
        .context("failed to delete group")?;
    println!("Deleted group");

    tracing::info!("demo finished");
    Ok(())
}

/// A membership left over from an earlier run is reported and skipped.
async fn add_member<S: GroupStorage>(
    storage: &S,
    member: Member,
    group_id: &str,
) -> anyhow::Result<()> {
    match storage.add_member_to_group(&member, group_id).await {
        Err(StorageError::MemberAlreadyExists) => {
            tracing::warn!(member = %member.member_ref(), group_id, "already a member, continuing");
            Ok(())
        }
        other => other.with_context(|| format!("failed to add {} to {group_id}", member.id())),
    }
}
