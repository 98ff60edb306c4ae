//! TigerStyle Constants
//!
//! Limits carry their unit in the name, largest qualifier last.

/// Maximum nesting of groups resolved when loading a group's membership.
pub const GROUP_MEMBERSHIP_DEPTH_MAX: usize = 32;

/// Default PostgreSQL host
pub const POSTGRES_HOST_DEFAULT: &str = "localhost";

/// Default PostgreSQL port
pub const POSTGRES_PORT_DEFAULT: u16 = 5432;

/// Default PostgreSQL database name
pub const POSTGRES_DATABASE_DEFAULT: &str = "cum";

/// Default PostgreSQL SSL mode
pub const POSTGRES_SSL_MODE_DEFAULT: &str = "disable";

/// Default size of the PostgreSQL connection pool
pub const POSTGRES_CONNECTIONS_COUNT_MAX_DEFAULT: u32 = 10;

/// Default Redis port
pub const REDIS_PORT_DEFAULT: u16 = 6379;

/// Password applied by a directory password reset
pub const LDAP_RESET_PASSWORD_DEFAULT: &str = "Cumulus";

/// Organizational unit holding directory users
pub const LDAP_USERS_OU_DEFAULT: &str = "ou=users";

/// Organizational unit holding directory groups
pub const LDAP_GROUPS_OU_DEFAULT: &str = "ou=groups";

/// Numeric id given to POSIX accounts and groups created in the directory
pub const LDAP_POSIX_ID_DEFAULT: &str = "1000";
