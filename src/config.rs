//! Storage selection from the command line
//!
//! Every flag has an environment fallback; `.env` is loaded before parsing.

use clap::{Args, ValueEnum};
use cumulus_core::constants::{
    POSTGRES_CONNECTIONS_COUNT_MAX_DEFAULT, POSTGRES_DATABASE_DEFAULT, POSTGRES_HOST_DEFAULT,
    POSTGRES_PORT_DEFAULT, POSTGRES_SSL_MODE_DEFAULT, REDIS_PORT_DEFAULT,
};
use cumulus_core::storage::{PostgresConfig, RedisConfig, StorageConfig};

/// Storage engines selectable at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Engine {
    /// Process-local maps; nothing survives exit
    Memory,
    /// PostgreSQL
    Postgres,
    /// Redis (no secondary lookups, no membership)
    Redis,
}

/// Storage flags shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct StorageArgs {
    /// Storage engine
    #[arg(long, global = true, value_enum, env = "CUMULUS_STORAGE")]
    pub storage: Option<Engine>,

    /// PostgreSQL host
    #[arg(long, global = true, env = "CUMULUS_POSTGRES_HOST", default_value = POSTGRES_HOST_DEFAULT)]
    pub postgres_host: String,

    /// PostgreSQL port
    #[arg(long, global = true, env = "CUMULUS_POSTGRES_PORT", default_value_t = POSTGRES_PORT_DEFAULT)]
    pub postgres_port: u16,

    /// PostgreSQL user
    #[arg(long, global = true, env = "CUMULUS_POSTGRES_USER", default_value = "postgres")]
    pub postgres_user: String,

    /// PostgreSQL password
    #[arg(
        long,
        global = true,
        env = "CUMULUS_POSTGRES_PASSWORD",
        default_value = "postgres",
        hide_env_values = true
    )]
    pub postgres_password: String,

    /// PostgreSQL database
    #[arg(long, global = true, env = "CUMULUS_POSTGRES_DATABASE", default_value = POSTGRES_DATABASE_DEFAULT)]
    pub postgres_database: String,

    /// PostgreSQL SSL mode
    #[arg(long, global = true, env = "CUMULUS_POSTGRES_SSL_MODE", default_value = POSTGRES_SSL_MODE_DEFAULT)]
    pub postgres_ssl_mode: String,

    /// Upper bound on pooled PostgreSQL connections
    #[arg(
        long,
        global = true,
        env = "CUMULUS_POSTGRES_MAX_CONNECTIONS",
        default_value_t = POSTGRES_CONNECTIONS_COUNT_MAX_DEFAULT,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub postgres_max_connections: u32,

    /// PostgreSQL connections kept open while idle
    #[arg(long, global = true, env = "CUMULUS_POSTGRES_MIN_CONNECTIONS", default_value_t = 0)]
    pub postgres_min_connections: u32,

    /// Redis host
    #[arg(long, global = true, env = "CUMULUS_REDIS_HOST", default_value = "localhost")]
    pub redis_host: String,

    /// Redis port
    #[arg(long, global = true, env = "CUMULUS_REDIS_PORT", default_value_t = REDIS_PORT_DEFAULT)]
    pub redis_port: u16,

    /// Redis password
    #[arg(long, global = true, env = "CUMULUS_REDIS_PASSWORD", hide_env_values = true)]
    pub redis_password: Option<String>,

    /// Redis logical database
    #[arg(long, global = true, env = "CUMULUS_REDIS_DB", default_value_t = 0)]
    pub redis_db: i64,
}

/// Why the flags do not describe an engine that can be opened.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no storage specified; pass --storage memory|postgres|redis")]
    MissingStorage,

    #[error("--postgres-min-connections ({min}) exceeds --postgres-max-connections ({max})")]
    ConnectionBounds { min: u32, max: u32 },
}

impl StorageArgs {
    /// The engine configuration these flags describe.
    ///
    /// # Errors
    /// Returns an error if no engine was selected or the pool bounds conflict.
    pub fn to_config(&self) -> Result<StorageConfig, ConfigError> {
        let engine = self.storage.ok_or(ConfigError::MissingStorage)?;

        Ok(match engine {
            Engine::Memory => StorageConfig::Memory,
            Engine::Postgres => {
                if self.postgres_min_connections > self.postgres_max_connections {
                    return Err(ConfigError::ConnectionBounds {
                        min: self.postgres_min_connections,
                        max: self.postgres_max_connections,
                    });
                }
                StorageConfig::Postgres(PostgresConfig {
                    host: self.postgres_host.clone(),
                    port: self.postgres_port,
                    user: self.postgres_user.clone(),
                    password: self.postgres_password.clone(),
                    database: self.postgres_database.clone(),
                    ssl_mode: self.postgres_ssl_mode.clone(),
                    max_connections: self.postgres_max_connections,
                    min_connections: self.postgres_min_connections,
                })
            }
            Engine::Redis => StorageConfig::Redis(RedisConfig {
                host: self.redis_host.clone(),
                port: self.redis_port,
                password: self.redis_password.clone(),
                db: self.redis_db,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        storage: StorageArgs,
    }

    fn parse(args: &[&str]) -> StorageArgs {
        let argv = std::iter::once("cumulus").chain(args.iter().copied());
        TestCli::try_parse_from(argv).unwrap().storage
    }

    #[test]
    fn test_memory() {
        let args = parse(&["--storage", "memory"]);
        assert!(matches!(args.to_config(), Ok(StorageConfig::Memory)));
    }

    #[test]
    fn test_postgres_defaults() {
        let args = parse(&["--storage", "postgres"]);
        let Ok(StorageConfig::Postgres(config)) = args.to_config() else {
            panic!("expected postgres config");
        };
        assert_eq!(config, PostgresConfig::default());
    }

    #[test]
    fn test_postgres_overrides() {
        let args = parse(&[
            "--storage",
            "postgres",
            "--postgres-host",
            "db.internal",
            "--postgres-port",
            "6543",
            "--postgres-ssl-mode",
            "require",
        ]);
        let Ok(StorageConfig::Postgres(config)) = args.to_config() else {
            panic!("expected postgres config");
        };
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 6543);
        assert_eq!(config.ssl_mode, "require");
    }

    #[test]
    fn test_redis() {
        let args = parse(&["--storage", "redis", "--redis-db", "3"]);
        let Ok(StorageConfig::Redis(config)) = args.to_config() else {
            panic!("expected redis config");
        };
        assert_eq!(config.db, 3);
        assert_eq!(config.port, 6379);
        assert_eq!(config.password, None);
    }

    #[test]
    fn test_unknown_engine_is_rejected() {
        let argv = ["cumulus", "--storage", "sqlite"];
        assert!(TestCli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_conflicting_pool_bounds() {
        let args = parse(&[
            "--storage",
            "postgres",
            "--postgres-max-connections",
            "2",
            "--postgres-min-connections",
            "5",
        ]);
        assert_eq!(
            args.to_config().unwrap_err(),
            ConfigError::ConnectionBounds { min: 5, max: 2 }
        );
    }
}
