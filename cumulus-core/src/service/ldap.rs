//! LdapService - Directory adapter
//!
//! TigerStyle: Every call dials, binds, runs one operation and unbinds.
//!
//! ```text
//! users:  uid=<username>,<users_ou>,<base_dn>   inetOrgPerson + posixAccount
//! teams:  cn=<name>,<groups_ou>,<base_dn>       posixGroup, memberUid per user
//! ```

use std::collections::{HashMap, HashSet};
use std::future::Future;

use async_trait::async_trait;
use ldap3::{dn_escape, ldap_escape, Ldap, LdapConnAsync, LdapError, Mod, Scope, SearchEntry};

use super::{Service, ServiceError, ServiceResult};
use crate::constants::{
    LDAP_GROUPS_OU_DEFAULT, LDAP_POSIX_ID_DEFAULT, LDAP_RESET_PASSWORD_DEFAULT,
    LDAP_USERS_OU_DEFAULT,
};
use crate::types::{Member, Team, User};

/// LDAP result code for a failed bind.
const RC_INVALID_CREDENTIALS: u32 = 49;
/// LDAP result code for a missing entry.
const RC_NO_SUCH_OBJECT: u32 = 32;

type Attributes = Vec<(String, HashSet<String>)>;

// =============================================================================
// Configuration
// =============================================================================

/// Where the directory lives and how to bind to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LdapConfig {
    /// `ldap://host:port` or `ldaps://host:port`
    pub url: String,
    /// Suffix of every entry, e.g. `dc=example,dc=com`
    pub base_dn: String,
    /// Service account used for every operation
    pub bind_dn: String,
    /// Service account password
    pub bind_password: String,
    /// Container of user entries, relative to `base_dn`
    pub users_ou: String,
    /// Container of group entries, relative to `base_dn`
    pub groups_ou: String,
}

impl LdapConfig {
    /// Configuration with the default `ou=users` / `ou=groups` containers.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        base_dn: impl Into<String>,
        bind_dn: impl Into<String>,
        bind_password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            base_dn: base_dn.into(),
            bind_dn: bind_dn.into(),
            bind_password: bind_password.into(),
            users_ou: LDAP_USERS_OU_DEFAULT.to_string(),
            groups_ou: LDAP_GROUPS_OU_DEFAULT.to_string(),
        }
    }

    /// DN of the users container.
    #[must_use]
    pub fn users_base(&self) -> String {
        format!("{},{}", self.users_ou, self.base_dn)
    }

    /// DN of the groups container.
    #[must_use]
    pub fn groups_base(&self) -> String {
        format!("{},{}", self.groups_ou, self.base_dn)
    }

    /// DN of the entry for `username`.
    #[must_use]
    pub fn user_dn(&self, username: &str) -> String {
        format!("uid={},{}", dn_escape(username), self.users_base())
    }

    /// DN of the entry for team `name`.
    #[must_use]
    pub fn team_dn(&self, name: &str) -> String {
        format!("cn={},{}", dn_escape(name), self.groups_base())
    }
}

// =============================================================================
// DirectoryConnection
// =============================================================================

/// A bound connection that lives for one logical operation.
///
/// Never stored; open it, use it, [`close`](Self::close) it.
pub struct DirectoryConnection {
    ldap: Ldap,
}

impl DirectoryConnection {
    /// Dial `config.url` and bind as the service account.
    ///
    /// # Errors
    /// `Connection` if the server cannot be reached, `Bind` if the service
    /// credentials are rejected.
    pub async fn open(config: &LdapConfig) -> ServiceResult<Self> {
        let (conn, mut ldap) = LdapConnAsync::new(&config.url)
            .await
            .map_err(|e| ServiceError::Connection(format!("{}: {e}", config.url)))?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!(error = %e, "ldap connection driver stopped");
            }
        });

        ldap.simple_bind(&config.bind_dn, &config.bind_password)
            .await
            .and_then(|result| result.success())
            .map_err(|e| ServiceError::Bind(e.to_string()))?;

        Ok(Self { ldap })
    }

    /// A handle onto the bound connection.
    #[must_use]
    pub fn handle(&self) -> Ldap {
        self.ldap.clone()
    }

    /// Unbind and drop the connection.
    pub async fn close(mut self) {
        if let Err(e) = self.ldap.unbind().await {
            tracing::debug!(error = %e, "ldap unbind failed");
        }
    }
}

// =============================================================================
// LdapService
// =============================================================================

/// Directory-backed [`Service`].
#[derive(Debug, Clone)]
pub struct LdapService {
    id: String,
    config: LdapConfig,
}

impl LdapService {
    /// Adapter named `id` talking to the directory in `config`.
    #[must_use]
    pub fn new(id: impl Into<String>, config: LdapConfig) -> Self {
        let id = id.into();
        assert!(!id.is_empty(), "service id cannot be empty");
        Self { id, config }
    }

    /// Directory configuration.
    #[must_use]
    pub fn config(&self) -> &LdapConfig {
        &self.config
    }

    async fn with_connection<T, F, Fut>(&self, op: F) -> ServiceResult<T>
    where
        F: FnOnce(Ldap) -> Fut + Send,
        Fut: Future<Output = Result<T, LdapError>> + Send,
        T: Send,
    {
        let conn = DirectoryConnection::open(&self.config).await?;
        let result = op(conn.handle()).await;
        conn.close().await;
        result.map_err(directory_error)
    }

    async fn modify_entry(&self, dn: String, mods: Vec<Mod<String>>) -> ServiceResult<()> {
        self.with_connection(|mut ldap| async move {
            ldap.modify(&dn, mods).await?.success()?;
            Ok::<_, LdapError>(())
        })
        .await
    }

    /// Check `password` for `username` by binding as that user.
    ///
    /// # Errors
    /// `NotFound` unless exactly one entry has that uid, `InvalidCredentials`
    /// if the bind is rejected.
    pub async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<()> {
        let filter = format!("(uid={})", ldap_escape(username));
        let base = self.config.base_dn.clone();

        let entries = self
            .with_connection(|mut ldap| async move {
                let (entries, _) = ldap
                    .search(&base, Scope::Subtree, &filter, vec!["1.1"])
                    .await?
                    .success()?;
                Ok::<_, LdapError>(entries)
            })
            .await?;

        if entries.len() != 1 {
            return Err(ServiceError::NotFound(format!(
                "{} entries with uid {username}",
                entries.len()
            )));
        }
        let user_dn = SearchEntry::construct(entries.into_iter().next().ok_or_else(|| {
            ServiceError::NotFound(format!("uid {username}"))
        })?)
        .dn;

        // Rebind as the user on its own connection.
        let conn = DirectoryConnection::open(&self.config).await?;
        let mut ldap = conn.handle();
        let result = ldap
            .simple_bind(&user_dn, password)
            .await
            .and_then(|r| r.success());
        conn.close().await;

        result.map(|_| ()).map_err(directory_error)?;
        tracing::debug!(username, "ldap authentication succeeded");
        Ok(())
    }

    /// Replace the mutable attributes of an existing user entry.
    ///
    /// # Errors
    /// Any directory failure; `NotFound` if the entry does not exist.
    pub async fn update_user(&self, user: &User) -> ServiceResult<()> {
        let mods = vec![
            replace("cn", &user.username),
            replace("sn", &user.username),
            replace("mail", &user.email),
            replace("userPassword", &user.password),
        ];
        self.modify_entry(self.config.user_dn(&user.username), mods).await
    }

    /// Replace the group id and the full member list of a team entry.
    ///
    /// # Errors
    /// Any directory failure; `NotFound` if the entry does not exist.
    pub async fn update_team(&self, team: &Team) -> ServiceResult<()> {
        let member_uids: HashSet<String> = team.users().map(|u| u.username.clone()).collect();
        let mods = vec![
            replace("gidNumber", &posix_id(team)),
            Mod::Replace("memberUid".to_string(), member_uids),
        ];
        self.modify_entry(self.config.team_dn(&team.name), mods).await
    }

    /// Add `username` to the team's `memberUid` list.
    ///
    /// # Errors
    /// Any directory failure.
    pub async fn add_user_to_team(&self, username: &str, team_name: &str) -> ServiceResult<()> {
        let mods = vec![Mod::Add(
            "memberUid".to_string(),
            HashSet::from([username.to_string()]),
        )];
        self.modify_entry(self.config.team_dn(team_name), mods).await
    }

    /// Remove `username` from the team's `memberUid` list.
    ///
    /// # Errors
    /// Any directory failure.
    pub async fn remove_user_from_team(&self, username: &str, team_name: &str) -> ServiceResult<()> {
        let mods = vec![Mod::Delete(
            "memberUid".to_string(),
            HashSet::from([username.to_string()]),
        )];
        self.modify_entry(self.config.team_dn(team_name), mods).await
    }

    /// Set a new password for `username`.
    ///
    /// # Errors
    /// Any directory failure.
    pub async fn change_password(&self, username: &str, password: &str) -> ServiceResult<()> {
        let mods = vec![replace("userPassword", password)];
        self.modify_entry(self.config.user_dn(username), mods).await
    }

    /// Reset the password of `username` to [`LDAP_RESET_PASSWORD_DEFAULT`].
    ///
    /// # Errors
    /// Any directory failure.
    pub async fn reset_password(&self, username: &str) -> ServiceResult<()> {
        tracing::info!(username, "resetting ldap password");
        self.change_password(username, LDAP_RESET_PASSWORD_DEFAULT).await
    }
}

impl std::fmt::Display for LdapService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.id, self.kind())
    }
}

#[async_trait]
impl Service for LdapService {
    async fn add_user(&self, user: &User) -> ServiceResult<()> {
        let dn = self.config.user_dn(&user.username);
        let attrs = user_attributes(user);

        self.with_connection(|mut ldap| async move {
            ldap.add(&dn, attrs).await?.success()?;
            Ok::<_, LdapError>(())
        })
        .await?;

        tracing::info!(username = %user.username, "added ldap user");
        Ok(())
    }

    async fn remove_user(&self, user: &User) -> ServiceResult<()> {
        let dn = self.config.user_dn(&user.username);

        self.with_connection(|mut ldap| async move {
            ldap.delete(&dn).await?.success()?;
            Ok::<_, LdapError>(())
        })
        .await?;

        tracing::info!(username = %user.username, "removed ldap user");
        Ok(())
    }

    async fn get_users(&self) -> ServiceResult<Vec<User>> {
        let base = self.config.users_base();

        let entries = self
            .with_connection(|mut ldap| async move {
                let (entries, _) = ldap
                    .search(
                        &base,
                        Scope::Subtree,
                        "(objectClass=inetOrgPerson)",
                        vec!["uid", "mail"],
                    )
                    .await?
                    .success()?;
                Ok::<_, LdapError>(entries)
            })
            .await?;

        Ok(entries
            .into_iter()
            .map(SearchEntry::construct)
            .map(|entry| entry_to_user(&entry))
            .collect())
    }

    async fn add_team(&self, team: &Team) -> ServiceResult<()> {
        let dn = self.config.team_dn(&team.name);
        let attrs = team_attributes(team);

        self.with_connection(|mut ldap| async move {
            ldap.add(&dn, attrs).await?.success()?;
            Ok::<_, LdapError>(())
        })
        .await?;

        tracing::info!(team = %team.name, "added ldap group");
        Ok(())
    }

    async fn remove_team(&self, team: &Team) -> ServiceResult<()> {
        let dn = self.config.team_dn(&team.name);

        self.with_connection(|mut ldap| async move {
            ldap.delete(&dn).await?.success()?;
            Ok::<_, LdapError>(())
        })
        .await?;

        tracing::info!(team = %team.name, "removed ldap group");
        Ok(())
    }

    async fn get_teams(&self) -> ServiceResult<Vec<Team>> {
        let base = self.config.groups_base();

        let entries = self
            .with_connection(|mut ldap| async move {
                let (entries, _) = ldap
                    .search(
                        &base,
                        Scope::Subtree,
                        "(objectClass=posixGroup)",
                        vec!["cn", "gidNumber", "memberUid"],
                    )
                    .await?
                    .success()?;
                Ok::<_, LdapError>(entries)
            })
            .await?;

        Ok(entries
            .into_iter()
            .map(SearchEntry::construct)
            .map(|entry| entry_to_team(&entry))
            .collect())
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        "ldap"
    }
}

// =============================================================================
// Entry Mapping
// =============================================================================

fn directory_error(e: LdapError) -> ServiceError {
    match e {
        LdapError::LdapResult { result } if result.rc == RC_INVALID_CREDENTIALS => {
            ServiceError::InvalidCredentials
        }
        LdapError::LdapResult { result } if result.rc == RC_NO_SUCH_OBJECT => {
            ServiceError::NotFound(result.matched)
        }
        LdapError::Io { source } => ServiceError::Connection(source.to_string()),
        other => ServiceError::Operation(other.to_string()),
    }
}

fn replace(attr: &str, value: &str) -> Mod<String> {
    Mod::Replace(attr.to_string(), HashSet::from([value.to_string()]))
}

fn attr(name: &str, values: &[&str]) -> (String, HashSet<String>) {
    (
        name.to_string(),
        values.iter().map(|v| (*v).to_string()).collect(),
    )
}

fn posix_id(team: &Team) -> String {
    if team.id.is_empty() {
        LDAP_POSIX_ID_DEFAULT.to_string()
    } else {
        team.id.clone()
    }
}

fn user_attributes(user: &User) -> Attributes {
    let home = format!("/home/{}", user.username);
    let mut attrs = vec![
        attr("objectClass", &["inetOrgPerson", "posixAccount", "shadowAccount"]),
        attr("cn", &[user.username.as_str()]),
        attr("sn", &[user.username.as_str()]),
        attr("uid", &[user.username.as_str()]),
        attr("uidNumber", &[LDAP_POSIX_ID_DEFAULT]),
        attr("gidNumber", &[LDAP_POSIX_ID_DEFAULT]),
        attr("homeDirectory", &[home.as_str()]),
        attr("loginShell", &["/bin/bash"]),
    ];
    if !user.email.is_empty() {
        attrs.push(attr("mail", &[user.email.as_str()]));
    }
    if !user.password.is_empty() {
        attrs.push(attr("userPassword", &[user.password.as_str()]));
    }
    attrs
}

fn team_attributes(team: &Team) -> Attributes {
    let gid = posix_id(team);
    let mut attrs = vec![
        attr("objectClass", &["top", "posixGroup"]),
        attr("cn", &[team.name.as_str()]),
        attr("gidNumber", &[gid.as_str()]),
    ];

    let member_uids: HashSet<String> = team.users().map(|u| u.username.clone()).collect();
    if !member_uids.is_empty() {
        attrs.push(("memberUid".to_string(), member_uids));
    }
    if !team.description.is_empty() {
        attrs.push(attr("description", &[team.description.as_str()]));
    }
    attrs
}

fn first(attrs: &HashMap<String, Vec<String>>, name: &str) -> String {
    attrs
        .get(name)
        .and_then(|values| values.first())
        .cloned()
        .unwrap_or_default()
}

/// Directory user entries carry no id of ours; the uid stands in for it.
fn entry_to_user(entry: &SearchEntry) -> User {
    let uid = first(&entry.attrs, "uid");
    User {
        id: uid.clone(),
        username: uid,
        email: first(&entry.attrs, "mail"),
        password: String::new(),
    }
}

fn entry_to_team(entry: &SearchEntry) -> Team {
    let mut team = Team::new(first(&entry.attrs, "gidNumber"), first(&entry.attrs, "cn"));
    if let Some(uids) = entry.attrs.get("memberUid") {
        team.members = uids
            .iter()
            .map(|uid| {
                Member::User(User {
                    id: uid.clone(),
                    username: uid.clone(),
                    email: String::new(),
                    password: String::new(),
                })
            })
            .collect();
    }
    team
}

// =============================================================================
// Tests
// =============================================================================
