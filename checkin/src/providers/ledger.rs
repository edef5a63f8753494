//! Attendance ledger trait.

use crate::error::Result;
use crate::types::{ActivityId, CheckinRecord, ParticipantId};
use chrono::{DateTime, Utc};

/// Result of an attempt to record a check-in.
///
/// A duplicate scan is a benign outcome, not an error: the caller gets the
/// previously stored record back and can tell the operator "already
/// recorded".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckinInsert {
    /// A new record was inserted.
    Recorded(CheckinRecord),

    /// A record for this `(participant, activity)` pair already existed;
    /// nothing was written.
    AlreadyCheckedIn(CheckinRecord),
}

impl CheckinInsert {
    /// The stored record, whether it was just inserted or pre-existing.
    #[must_use]
    pub const fn record(&self) -> &CheckinRecord {
        match self {
            Self::Recorded(record) | Self::AlreadyCheckedIn(record) => record,
        }
    }
}

/// Durable, queryable attendance history enforcing at most one check-in per
/// participant per activity.
pub trait AttendanceLedger: Send + Sync {
    /// Atomically record a check-in, or return the existing record.
    ///
    /// The check-then-insert must be a single atomic step: two concurrent
    /// scans of the same token for the same activity yield exactly one
    /// stored record, with the loser observing
    /// [`CheckinInsert::AlreadyCheckedIn`].
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Either reference is invalid → `ReferenceNotFound`
    /// - The insert fails → `Database`
    async fn record_checkin(
        &self,
        participant_id: ParticipantId,
        activity_id: ActivityId,
        checked_in_at: DateTime<Utc>,
    ) -> Result<CheckinInsert>;

    /// Attendance for an activity, ordered by `checked_in_at` ascending.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list_by_activity(&self, activity_id: ActivityId) -> Result<Vec<CheckinRecord>>;

    /// A participant's check-ins, ordered by `checked_in_at` ascending.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list_by_participant(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Vec<CheckinRecord>>;
}
