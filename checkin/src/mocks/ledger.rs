//! Mock attendance ledger.

use super::{MockActivityRepository, MockParticipantRepository};
use crate::error::{CheckinError, Result};
use crate::providers::{
    ActivityRepository, AttendanceLedger, CheckinInsert, ParticipantRepository,
};
use crate::types::{ActivityId, CheckinId, CheckinRecord, ParticipantId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    rows: Vec<CheckinRecord>,
    by_pair: HashMap<(i64, i64), usize>,
}

/// Mock attendance ledger backed by in-memory storage.
///
/// Referential validation consults the participant and activity mocks it was
/// built from; the check-then-insert is atomic under the inner lock.
#[derive(Debug, Clone)]
pub struct MockAttendanceLedger {
    participants: MockParticipantRepository,
    activities: MockActivityRepository,
    inner: Arc<Mutex<Inner>>,
}

impl MockAttendanceLedger {
    /// Create an empty ledger validating against the given mocks.
    #[must_use]
    pub fn new(
        participants: MockParticipantRepository,
        activities: MockActivityRepository,
    ) -> Self {
        Self {
            participants,
            activities,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }
}

impl AttendanceLedger for MockAttendanceLedger {
    async fn record_checkin(
        &self,
        participant_id: ParticipantId,
        activity_id: ActivityId,
        checked_in_at: DateTime<Utc>,
    ) -> Result<CheckinInsert> {
        if self.participants.find_by_id(participant_id).await?.is_none() {
            return Err(CheckinError::ReferenceNotFound {
                entity: "participant",
                id: participant_id.as_i64(),
            });
        }
        if self.activities.find_by_id(activity_id).await?.is_none() {
            return Err(CheckinError::ReferenceNotFound {
                entity: "activity",
                id: activity_id.as_i64(),
            });
        }

        let mut inner = self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?;

        let pair = (participant_id.as_i64(), activity_id.as_i64());
        if let Some(&index) = inner.by_pair.get(&pair) {
            return Ok(CheckinInsert::AlreadyCheckedIn(inner.rows[index].clone()));
        }

        inner.next_id += 1;
        let record = CheckinRecord {
            checkin_id: CheckinId::from_i64(inner.next_id),
            participant_id,
            activity_id,
            checked_in_at,
        };
        inner.rows.push(record.clone());
        let index = inner.rows.len() - 1;
        inner.by_pair.insert(pair, index);
        Ok(CheckinInsert::Recorded(record))
    }

    async fn list_by_activity(&self, activity_id: ActivityId) -> Result<Vec<CheckinRecord>> {
        let mut records: Vec<CheckinRecord> = self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?
            .rows
            .iter()
            .filter(|r| r.activity_id == activity_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| (r.checked_in_at, r.checkin_id));
        Ok(records)
    }

    async fn list_by_participant(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Vec<CheckinRecord>> {
        let mut records: Vec<CheckinRecord> = self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?
            .rows
            .iter()
            .filter(|r| r.participant_id == participant_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| (r.checked_in_at, r.checkin_id));
        Ok(records)
    }
}
