use std::str::FromStr;

use crate::api::error;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_INSERT_RETRY_ATTEMPTS: u32 = 3;

pub const PENDING_REQUEST_EXISTS: &str = "A pending request already exists";
pub const ALREADY_FRIENDS: &str = "Requester and requested are already friends";
pub const ACCEPT_MISSING_REQUEST: &str = "Cannot accept request that does not exist!";
pub const RELATIONSHIP_NOT_FOUND: &str = "Relationship does not exist";
pub const SELF_RELATIONSHIP: &str = "Cannot send friend request to yourself";

/// Knobs of the relationship engine itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    /// Drop accounts with a pending request to or from the subject out of `get_non_friends`.
    pub non_friends_exclude_pending: bool,
    /// How often `insert` re-checks the pair after losing a uniqueness race.
    pub insert_retry_attempts: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig {
            non_friends_exclude_pending: false,
            insert_retry_attempts: DEFAULT_INSERT_RETRY_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Env {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub log_level: tracing::Level,
    pub graph: GraphConfig,
}

impl Env {
    /// Reads the process environment, loading a `.env` file first when one exists.
    pub fn from_env() -> Result<Self, error::SystemError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, error::SystemError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let max_connections =
            parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let acquire_timeout_secs =
            parse_or(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS", DEFAULT_ACQUIRE_TIMEOUT_SECS)?;
        let log_level = parse_or(&lookup, "LOG_LEVEL", tracing::Level::INFO)?;

        let non_friends_exclude_pending = parse_or(&lookup, "NON_FRIENDS_EXCLUDE_PENDING", false)?;
        let insert_retry_attempts =
            parse_or(&lookup, "RELATIONSHIP_INSERT_RETRIES", DEFAULT_INSERT_RETRY_ATTEMPTS)?;

        Ok(Env {
            database_url,
            max_connections,
            acquire_timeout_secs,
            log_level,
            graph: GraphConfig { non_friends_exclude_pending, insert_retry_attempts },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, error::SystemError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| error::SystemError::config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}
