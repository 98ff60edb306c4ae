//! Placeholder adapters
//!
//! These accept every call and report no users or teams. They fix the shape
//! of each integration's configuration until a real client is written.

use async_trait::async_trait;

use super::{Service, ServiceResult};
use crate::types::{Team, User};

macro_rules! placeholder_service {
    ($name:ident, id = $id:expr, kind = $kind:expr) => {
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}-{}", $id, $kind)
            }
        }

        #[async_trait]
        impl Service for $name {
            async fn add_user(&self, user: &User) -> ServiceResult<()> {
                tracing::debug!(service = $id, user_id = %user.id, "add_user ignored");
                Ok(())
            }

            async fn remove_user(&self, user: &User) -> ServiceResult<()> {
                tracing::debug!(service = $id, user_id = %user.id, "remove_user ignored");
                Ok(())
            }

            async fn get_users(&self) -> ServiceResult<Vec<User>> {
                Ok(Vec::new())
            }

            async fn add_team(&self, team: &Team) -> ServiceResult<()> {
                tracing::debug!(service = $id, team = %team.name, "add_team ignored");
                Ok(())
            }

            async fn remove_team(&self, team: &Team) -> ServiceResult<()> {
                tracing::debug!(service = $id, team = %team.name, "remove_team ignored");
                Ok(())
            }

            async fn get_teams(&self) -> ServiceResult<Vec<Team>> {
                Ok(Vec::new())
            }

            fn id(&self) -> &str {
                $id
            }

            fn kind(&self) -> &str {
                $kind
            }
        }
    };
}

/// Slack workspace.
#[derive(Debug, Clone)]
pub struct SlackService {
    token: String,
}

impl SlackService {
    /// Adapter authenticated with an API token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    /// API token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

placeholder_service!(SlackService, id = "slack", kind = "slack");

/// GitLab instance.
#[derive(Debug, Clone)]
pub struct GitlabService {
    /// Instance base URL
    pub host: String,
    /// Personal or group access token
    pub token: String,
}

impl GitlabService {
    /// Adapter for the instance at `host`.
    #[must_use]
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: token.into(),
        }
    }
}

placeholder_service!(GitlabService, id = "gitlab", kind = "gitlab");

/// AWS IAM.
#[derive(Debug, Clone)]
pub struct AwsService {
    /// Region the IAM client talks to
    pub region: String,
}

impl AwsService {
    /// Adapter for `region`.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }
}

placeholder_service!(AwsService, id = "aws", kind = "iam");

/// Kubernetes cluster.
#[derive(Debug, Clone, Default)]
pub struct KubernetesService {
    /// kubeconfig context; the current context when empty
    pub context: String,
}

placeholder_service!(KubernetesService, id = "kubernetes", kind = "kubernetes");

/// OpenVPN server managed through its binary and files.
#[derive(Debug, Clone)]
pub struct OpenVpnService {
    /// Path to the `openvpn` binary
    pub binary: String,
    /// Server configuration file
    pub config: String,
    /// Log file
    pub log: String,
    /// PID file
    pub pid: String,
}

impl Default for OpenVpnService {
    fn default() -> Self {
        Self {
            binary: "/usr/sbin/openvpn".to_string(),
            config: "/etc/openvpn/server.conf".to_string(),
            log: "/var/log/openvpn.log".to_string(),
            pid: "/var/run/openvpn.pid".to_string(),
        }
    }
}

placeholder_service!(OpenVpnService, id = "openvpn", kind = "vpn");

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_placeholders_accept_everything() {
        let services: Vec<Arc<dyn Service>> = vec![
            Arc::new(SlackService::new("xoxb-token")),
            Arc::new(GitlabService::new("https://gitlab.example.com", "glpat")),
            Arc::new(AwsService::new("eu-west-1")),
            Arc::new(KubernetesService::default()),
            Arc::new(OpenVpnService::default()),
        ];

        let user = User::new("alice", "alice@example.com", "pw");
        let team = Team::new("1000", "developers");

        for service in &services {
            assert!(service.add_user(&user).await.is_ok());
            assert!(service.remove_user(&user).await.is_ok());
            assert!(service.add_team(&team).await.is_ok());
            assert!(service.remove_team(&team).await.is_ok());
            assert!(service.get_users().await.unwrap().is_empty());
            assert!(service.get_teams().await.unwrap().is_empty());
        }
    }

    #[test]
    fn test_identity() {
        let aws = AwsService::new("us-east-1");
        assert_eq!(aws.id(), "aws");
        assert_eq!(aws.kind(), "iam");
        assert_eq!(aws.to_string(), "aws-iam");

        let slack = SlackService::new("t");
        assert_eq!(slack.token(), "t");
        assert_eq!(slack.to_string(), "slack-slack");
    }
}
