//! SQLite attendance ledger.

use super::{activity_exists, participant_exists};
use crate::error::{CheckinError, Result};
use crate::providers::{AttendanceLedger, CheckinInsert};
use crate::types::{ActivityId, CheckinId, CheckinRecord, ParticipantId};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

type CheckinRow = (i64, i64, i64, DateTime<Utc>);

fn record_from_row(row: CheckinRow) -> CheckinRecord {
    let (checkin_id, participant_id, activity_id, checked_in_at) = row;
    CheckinRecord {
        checkin_id: CheckinId::from_i64(checkin_id),
        participant_id: ParticipantId::from_i64(participant_id),
        activity_id: ActivityId::from_i64(activity_id),
        checked_in_at,
    }
}

/// SQLite-backed attendance ledger.
///
/// The `UNIQUE (participant_id, activity_id)` index owns the at-most-once
/// invariant; the insert races through it rather than around it.
#[derive(Clone)]
pub struct SqliteAttendanceLedger {
    pool: SqlitePool,
}

impl SqliteAttendanceLedger {
    /// Create a new ledger over a shared pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn existing_record(
        &self,
        participant_id: ParticipantId,
        activity_id: ActivityId,
    ) -> Result<Option<CheckinRecord>> {
        let row: Option<CheckinRow> = sqlx::query_as(
            "SELECT checkin_id, participant_id, activity_id, checked_in_at
             FROM checkins
             WHERE participant_id = ?1 AND activity_id = ?2",
        )
        .bind(participant_id.as_i64())
        .bind(activity_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to get check-in: {e}")))?;

        Ok(row.map(record_from_row))
    }
}

impl AttendanceLedger for SqliteAttendanceLedger {
    async fn record_checkin(
        &self,
        participant_id: ParticipantId,
        activity_id: ActivityId,
        checked_in_at: DateTime<Utc>,
    ) -> Result<CheckinInsert> {
        // Participants and activities are never deleted, so these checks
        // cannot go stale before the insert below.
        if !participant_exists(&self.pool, participant_id).await? {
            return Err(CheckinError::ReferenceNotFound {
                entity: "participant",
                id: participant_id.as_i64(),
            });
        }
        if !activity_exists(&self.pool, activity_id).await? {
            return Err(CheckinError::ReferenceNotFound {
                entity: "activity",
                id: activity_id.as_i64(),
            });
        }

        // Single atomic statement: concurrent scans of the same pair race on
        // the unique index and the loser inserts nothing.
        let result = sqlx::query(
            "INSERT INTO checkins (participant_id, activity_id, checked_in_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (participant_id, activity_id) DO NOTHING",
        )
        .bind(participant_id.as_i64())
        .bind(activity_id.as_i64())
        .bind(checked_in_at)
        .execute(&self.pool)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to record check-in: {e}")))?;

        if result.rows_affected() == 1 {
            return Ok(CheckinInsert::Recorded(CheckinRecord {
                checkin_id: CheckinId::from_i64(result.last_insert_rowid()),
                participant_id,
                activity_id,
                checked_in_at,
            }));
        }

        match self.existing_record(participant_id, activity_id).await? {
            Some(record) => Ok(CheckinInsert::AlreadyCheckedIn(record)),
            None => Err(CheckinError::Database(
                "check-in conflicted but no existing record found".to_string(),
            )),
        }
    }

    async fn list_by_activity(&self, activity_id: ActivityId) -> Result<Vec<CheckinRecord>> {
        let rows: Vec<CheckinRow> = sqlx::query_as(
            "SELECT checkin_id, participant_id, activity_id, checked_in_at
             FROM checkins
             WHERE activity_id = ?1
             ORDER BY checked_in_at ASC, checkin_id ASC",
        )
        .bind(activity_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to list check-ins: {e}")))?;

        Ok(rows.into_iter().map(record_from_row).collect())
    }

    async fn list_by_participant(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Vec<CheckinRecord>> {
        let rows: Vec<CheckinRow> = sqlx::query_as(
            "SELECT checkin_id, participant_id, activity_id, checked_in_at
             FROM checkins
             WHERE participant_id = ?1
             ORDER BY checked_in_at ASC, checkin_id ASC",
        )
        .bind(participant_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to list check-ins: {e}")))?;

        Ok(rows.into_iter().map(record_from_row).collect())
    }
}
