//! Configuration Management
//!
//! Connection settings come from the process environment, optionally seeded
//! from a `.env` file in the working directory.
//!
//! # Variables
//! - `DB_USER` (required)
//! - `DB_DATABASE` (required)
//! - `DB_HOST` (default `localhost`)
//! - `DB_PORT` (default `5432`)
//! - `DB_PASSWORD` (default empty)

use crate::error::{Result, TrackerError};

pub const ENV_USER: &str = "DB_USER";
pub const ENV_HOST: &str = "DB_HOST";
pub const ENV_DATABASE: &str = "DB_DATABASE";
pub const ENV_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_PORT: &str = "DB_PORT";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;

/// Connection configuration for the PostgreSQL session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Hostname
    pub host: String,

    /// Port number
    pub port: u16,

    /// Username
    pub user: String,

    /// Password
    /// WARNING: Sensitive data, do not log or include in error messages
    pub password: String,

    /// Database name
    pub database: String,
}

impl ConnectionConfig {
    /// Build a config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let user = non_empty(ENV_USER).ok_or_else(|| missing(ENV_USER))?;
        let database = non_empty(ENV_DATABASE).ok_or_else(|| missing(ENV_DATABASE))?;
        let host = non_empty(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let password = lookup(ENV_PASSWORD).unwrap_or_default();

        let port = match non_empty(ENV_PORT) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                TrackerError::config_error(format!("{ENV_PORT} must be a port number, got '{raw}'"))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self { host, port, user, password, database })
    }

    /// `user@host:port/database`, safe for logs
    #[must_use]
    pub fn redacted(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

/// Seed the process environment from `.env` when the file exists
///
/// Variables already set in the environment win over the file. Must run
/// before anything reads the environment (including CLI parsing).
pub fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded .env file");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(TrackerError::config_error(format!("Could not read .env file: {e}"))),
    }
}

fn missing(key: &str) -> TrackerError {
    TrackerError::config_error(format!("Environment variable {key} is not set"))
}
