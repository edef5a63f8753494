//! SQLite activity repository.

use super::{activity_exists, event_exists};
use crate::error::{CheckinError, Result};
use crate::providers::ActivityRepository;
use crate::types::{Activity, ActivityId, ActivityStatus, EventId};
use sqlx::SqlitePool;

/// SQLite-backed activity repository.
#[derive(Clone)]
pub struct SqliteActivityRepository {
    pool: SqlitePool,
}

impl SqliteActivityRepository {
    /// Create a new repository over a shared pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn prerequisites_of(&self, activity_id: ActivityId) -> Result<Vec<ActivityId>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT prerequisite_id FROM activity_prerequisites
             WHERE activity_id = ?1
             ORDER BY prerequisite_id",
        )
        .bind(activity_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to load prerequisites: {e}")))?;

        Ok(rows.into_iter().map(|(id,)| ActivityId::from_i64(id)).collect())
    }

    async fn activity_from_row(&self, row: (i64, String, i64, String)) -> Result<Activity> {
        let (activity_id, name, event_id, status) = row;
        let activity_id = ActivityId::from_i64(activity_id);
        Ok(Activity {
            activity_id,
            name,
            event_id: EventId::from_i64(event_id),
            status: status.parse()?,
            prerequisites: self.prerequisites_of(activity_id).await?,
        })
    }
}

impl ActivityRepository for SqliteActivityRepository {
    async fn create_activity(
        &self,
        name: &str,
        event_id: EventId,
        status: ActivityStatus,
    ) -> Result<Activity> {
        if !event_exists(&self.pool, event_id).await? {
            return Err(CheckinError::ReferenceNotFound {
                entity: "event",
                id: event_id.as_i64(),
            });
        }

        let result =
            sqlx::query("INSERT INTO activities (name, event_id, status) VALUES (?1, ?2, ?3)")
                .bind(name)
                .bind(event_id.as_i64())
                .bind(status.as_str())
                .execute(&self.pool)
                .await
                .map_err(|e| CheckinError::Database(format!("failed to create activity: {e}")))?;

        Ok(Activity {
            activity_id: ActivityId::from_i64(result.last_insert_rowid()),
            name: name.to_string(),
            event_id,
            status,
            prerequisites: Vec::new(),
        })
    }

    async fn find_by_id(&self, activity_id: ActivityId) -> Result<Option<Activity>> {
        let row: Option<(i64, String, i64, String)> = sqlx::query_as(
            "SELECT activity_id, name, event_id, status
             FROM activities
             WHERE activity_id = ?1",
        )
        .bind(activity_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to get activity: {e}")))?;

        match row {
            Some(row) => Ok(Some(self.activity_from_row(row).await?)),
            None => Ok(None),
        }
    }

    async fn is_open_for_checkin(&self, activity_id: ActivityId) -> Result<bool> {
        let row: (i64,) = sqlx::query_as(
            "SELECT EXISTS(
                 SELECT 1 FROM activities WHERE activity_id = ?1 AND status = 'active'
             )",
        )
        .bind(activity_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to check activity status: {e}")))?;

        Ok(row.0 != 0)
    }

    async fn list_by_event(&self, event_id: EventId) -> Result<Vec<Activity>> {
        let rows: Vec<(i64, String, i64, String)> = sqlx::query_as(
            "SELECT activity_id, name, event_id, status
             FROM activities
             WHERE event_id = ?1",
        )
        .bind(event_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to list activities: {e}")))?;

        let mut activities = Vec::with_capacity(rows.len());
        for row in rows {
            activities.push(self.activity_from_row(row).await?);
        }
        Ok(activities)
    }

    async fn advance_status(
        &self,
        activity_id: ActivityId,
        to: ActivityStatus,
    ) -> Result<Activity> {
        let Some(current) = self.find_by_id(activity_id).await? else {
            return Err(CheckinError::ReferenceNotFound {
                entity: "activity",
                id: activity_id.as_i64(),
            });
        };

        if to <= current.status {
            return Err(CheckinError::InvalidStatusTransition {
                from: current.status,
                to,
            });
        }

        // Guarding on the observed status makes the move a compare-and-swap:
        // a racing administrator loses cleanly instead of rewinding status.
        let result = sqlx::query(
            "UPDATE activities SET status = ?2 WHERE activity_id = ?1 AND status = ?3",
        )
        .bind(activity_id.as_i64())
        .bind(to.as_str())
        .bind(current.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to update activity status: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(CheckinError::Database(
                "activity status changed concurrently".to_string(),
            ));
        }

        Ok(Activity { status: to, ..current })
    }

    async fn add_prerequisite(
        &self,
        activity_id: ActivityId,
        prerequisite_id: ActivityId,
    ) -> Result<()> {
        for id in [activity_id, prerequisite_id] {
            if !activity_exists(&self.pool, id).await? {
                return Err(CheckinError::ReferenceNotFound {
                    entity: "activity",
                    id: id.as_i64(),
                });
            }
        }

        if activity_id == prerequisite_id {
            return Err(CheckinError::PrerequisiteCycle);
        }

        // Walk the prerequisite graph from the proposed prerequisite; if the
        // activity is already reachable, the new edge would close a cycle.
        let mut queue = vec![prerequisite_id];
        let mut seen = std::collections::HashSet::new();
        while let Some(next) = queue.pop() {
            if next == activity_id {
                return Err(CheckinError::PrerequisiteCycle);
            }
            if seen.insert(next) {
                queue.extend(self.prerequisites_of(next).await?);
            }
        }

        sqlx::query(
            "INSERT INTO activity_prerequisites (activity_id, prerequisite_id)
             VALUES (?1, ?2)
             ON CONFLICT (activity_id, prerequisite_id) DO NOTHING",
        )
        .bind(activity_id.as_i64())
        .bind(prerequisite_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to add prerequisite: {e}")))?;

        Ok(())
    }
}
