//! SQLite-backed stores.
//!
//! The system of record is an embedded SQLite database. All stores share one
//! [`SqlitePool`]; schema management goes through [`migrate`].
//!
//! # Example
//!
//! ```no_run
//! use checkin::config::DatabaseConfig;
//! use checkin::stores::sqlite;
//!
//! # async fn example() -> checkin::Result<()> {
//! let pool = sqlite::connect(&DatabaseConfig::default()).await?;
//! sqlite::migrate(&pool).await?;
//! let participants = sqlite::SqliteParticipantRepository::new(pool.clone());
//! # Ok(())
//! # }
//! ```

pub mod activities;
pub mod events;
pub mod ledger;
pub mod participants;

pub use activities::SqliteActivityRepository;
pub use events::SqliteEventDirectory;
pub use ledger::SqliteAttendanceLedger;
pub use participants::SqliteParticipantRepository;

use crate::config::DatabaseConfig;
use crate::error::{CheckinError, Result};
use crate::types::{ActivityId, EventId, ParticipantId};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// Open a connection pool for the configured database.
///
/// Foreign-key enforcement is switched on for every connection; the file is
/// created if missing.
///
/// # Errors
///
/// Returns error if the url is malformed or the database cannot be opened.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| CheckinError::Database(format!("invalid database url: {e}")))?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to open database: {e}")))
}

/// Run pending schema migrations.
///
/// # Errors
///
/// Returns error if a migration fails to apply.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| CheckinError::Database(format!("migration failed: {e}")))?;
    Ok(())
}

pub(crate) async fn event_exists(pool: &SqlitePool, event_id: EventId) -> Result<bool> {
    let row: (i64,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM events WHERE event_id = ?1)")
            .bind(event_id.as_i64())
            .fetch_one(pool)
            .await
            .map_err(|e| CheckinError::Database(format!("failed to check event: {e}")))?;
    Ok(row.0 != 0)
}

pub(crate) async fn participant_exists(
    pool: &SqlitePool,
    participant_id: ParticipantId,
) -> Result<bool> {
    let row: (i64,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM participants WHERE participant_id = ?1)")
            .bind(participant_id.as_i64())
            .fetch_one(pool)
            .await
            .map_err(|e| CheckinError::Database(format!("failed to check participant: {e}")))?;
    Ok(row.0 != 0)
}

pub(crate) async fn activity_exists(pool: &SqlitePool, activity_id: ActivityId) -> Result<bool> {
    let row: (i64,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM activities WHERE activity_id = ?1)")
            .bind(activity_id.as_i64())
            .fetch_one(pool)
            .await
            .map_err(|e| CheckinError::Database(format!("failed to check activity: {e}")))?;
    Ok(row.0 != 0)
}
