//! SQLite event directory.

use crate::error::{CheckinError, Result};
use crate::providers::EventDirectory;
use crate::types::{Event, EventId};
use sqlx::SqlitePool;

/// SQLite-backed event directory.
#[derive(Clone)]
pub struct SqliteEventDirectory {
    pool: SqlitePool,
}

impl SqliteEventDirectory {
    /// Create a new directory over a shared pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl EventDirectory for SqliteEventDirectory {
    async fn create_event(&self, name: &str) -> Result<Event> {
        let result = sqlx::query("INSERT INTO events (name) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| CheckinError::Database(format!("failed to create event: {e}")))?;

        Ok(Event {
            event_id: EventId::from_i64(result.last_insert_rowid()),
            name: name.to_string(),
        })
    }

    async fn find_by_id(&self, event_id: EventId) -> Result<Option<Event>> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT event_id, name FROM events WHERE event_id = ?1")
                .bind(event_id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| CheckinError::Database(format!("failed to get event: {e}")))?;

        Ok(row.map(|(id, name)| Event {
            event_id: EventId::from_i64(id),
            name,
        }))
    }
}
