//! Project - Services and the teams that use them

use std::sync::Arc;

use super::{Team, User};
use crate::service::{Service, ServiceResult};

/// A project ties a set of external services to the teams working on it.
#[derive(Clone, Default)]
pub struct Project {
    /// Identifier
    pub id: String,
    /// Project name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Services users of this project are provisioned into
    pub services: Vec<Arc<dyn Service>>,
    /// Teams working on this project
    pub teams: Vec<Team>,
}

impl Project {
    /// Create a project with no services or teams.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attach a service.
    #[must_use]
    pub fn with_service(mut self, service: Arc<dyn Service>) -> Self {
        self.services.push(service);
        self
    }

    /// Add `user` to every attached service, in attachment order.
    ///
    /// # Errors
    /// Returns the first service failure; later services are not called.
    pub async fn provision_user(&self, user: &User) -> ServiceResult<()> {
        tracing::debug!(project = %self.id, user = %user.id, "provisioning user");
        for service in &self.services {
            service.add_user(user).await?;
        }
        Ok(())
    }

    /// Remove `user` from every attached service, in attachment order.
    ///
    /// # Errors
    /// Returns the first service failure; later services are not called.
    pub async fn deprovision_user(&self, user: &User) -> ServiceResult<()> {
        tracing::debug!(project = %self.id, user = %user.id, "deprovisioning user");
        for service in &self.services {
            service.remove_user(user).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field(
                "services",
                &self.services.iter().map(ToString::to_string).collect::<Vec<_>>(),
            )
            .field("teams", &self.teams)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{SlackService, ServiceError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Refusing;

    impl std::fmt::Display for Refusing {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "refusing")
        }
    }

    #[async_trait]
    impl Service for Refusing {
        async fn add_user(&self, _user: &User) -> ServiceResult<()> {
            tokio::task::yield_now().await;
            Err(ServiceError::Operation("no seats left".into()))
        }
        async fn remove_user(&self, _user: &User) -> ServiceResult<()> {
            tokio::task::yield_now().await;
            Err(ServiceError::Operation("seat is locked".into()))
        }
        async fn get_users(&self) -> ServiceResult<Vec<User>> {
            Ok(Vec::new())
        }
        async fn add_team(&self, _team: &Team) -> ServiceResult<()> {
            Ok(())
        }
        async fn remove_team(&self, _team: &Team) -> ServiceResult<()> {
            Ok(())
        }
        async fn get_teams(&self) -> ServiceResult<Vec<Team>> {
            Ok(Vec::new())
        }
        fn id(&self) -> &str {
            "refusing"
        }
        fn kind(&self) -> &str {
            "test"
        }
    }

    #[derive(Default)]
    struct Recording {
        calls: AtomicUsize,
    }

    impl std::fmt::Display for Recording {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "recording")
        }
    }

    #[async_trait]
    impl Service for Recording {
        async fn add_user(&self, _user: &User) -> ServiceResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn remove_user(&self, _user: &User) -> ServiceResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn get_users(&self) -> ServiceResult<Vec<User>> {
            Ok(Vec::new())
        }
        async fn add_team(&self, _team: &Team) -> ServiceResult<()> {
            Ok(())
        }
        async fn remove_team(&self, _team: &Team) -> ServiceResult<()> {
            Ok(())
        }
        async fn get_teams(&self) -> ServiceResult<Vec<Team>> {
            Ok(Vec::new())
        }
        fn id(&self) -> &str {
            "recording"
        }
        fn kind(&self) -> &str {
            "test"
        }
    }

    #[tokio::test]
    async fn test_provision_user_fans_out() {
        let project = Project::new("p1", "website")
            .with_service(Arc::new(SlackService::new("token")));
        let user = User::new("alice", "alice@example.com", "pw");

        assert!(project.provision_user(&user).await.is_ok());
        assert!(project.deprovision_user(&user).await.is_ok());
    }

    #[tokio::test]
    async fn test_provision_user_surfaces_failure() {
        let project = Project::new("p1", "website")
            .with_service(Arc::new(SlackService::new("token")))
            .with_service(Arc::new(Refusing));
        let user = User::new("alice", "alice@example.com", "pw");

        let err = project.provision_user(&user).await.unwrap_err();
        assert!(matches!(err, ServiceError::Operation(_)));
        assert!(format!("{project:?}").contains("refusing"));
    }

    #[tokio::test]
    async fn test_services_after_a_failure_are_not_called() {
        let recording = Arc::new(Recording::default());
        let project = Project::new("p1", "website")
            .with_service(Arc::new(Refusing))
            .with_service(recording.clone());
        let user = User::new("alice", "alice@example.com", "pw");

        assert!(project.provision_user(&user).await.is_err());
        assert!(project.deprovision_user(&user).await.is_err());
        assert_eq!(recording.calls.load(Ordering::SeqCst), 0);
    }
}
