//! Configuration management.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// `SQLite` configuration (system of record).
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// `SQLite` configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL.
    pub url: String,

    /// Maximum number of connections in the pool.
    pub max_connections: u32,

    /// How long a connection waits on a locked database before failing, in
    /// milliseconds.
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    /// Load database configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            url: env::var("CHECKIN_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:checkin.db".to_string()),
            max_connections: env::var("CHECKIN_DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            busy_timeout_ms: env::var("CHECKIN_DATABASE_BUSY_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5000),
        }
    }

    /// An in-memory database on a single connection, for tests and demos.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            busy_timeout_ms: 5000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
