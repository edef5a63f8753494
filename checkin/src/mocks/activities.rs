//! Mock activity repository.

use super::MockEventDirectory;
use crate::error::{CheckinError, Result};
use crate::providers::{ActivityRepository, EventDirectory};
use crate::types::{Activity, ActivityId, ActivityStatus, EventId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<i64, Activity>,
}

impl Inner {
    fn would_cycle(&self, activity_id: ActivityId, prerequisite_id: ActivityId) -> bool {
        let mut queue = vec![prerequisite_id];
        let mut seen = std::collections::HashSet::new();
        while let Some(next) = queue.pop() {
            if next == activity_id {
                return true;
            }
            if seen.insert(next) {
                if let Some(activity) = self.rows.get(&next.as_i64()) {
                    queue.extend(activity.prerequisites.iter().copied());
                }
            }
        }
        false
    }
}

/// Mock activity repository backed by in-memory storage.
#[derive(Debug, Clone)]
pub struct MockActivityRepository {
    events: MockEventDirectory,
    inner: Arc<Mutex<Inner>>,
}

impl MockActivityRepository {
    /// Create an empty repository validating against `events`.
    #[must_use]
    pub fn new(events: MockEventDirectory) -> Self {
        Self {
            events,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }
}

impl ActivityRepository for MockActivityRepository {
    async fn create_activity(
        &self,
        name: &str,
        event_id: EventId,
        status: ActivityStatus,
    ) -> Result<Activity> {
        if self.events.find_by_id(event_id).await?.is_none() {
            return Err(CheckinError::ReferenceNotFound {
                entity: "event",
                id: event_id.as_i64(),
            });
        }

        let mut inner = self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?;

        inner.next_id += 1;
        let id = inner.next_id;
        let activity = Activity {
            activity_id: ActivityId::from_i64(id),
            name: name.to_string(),
            event_id,
            status,
            prerequisites: Vec::new(),
        };
        inner.rows.insert(id, activity.clone());
        Ok(activity)
    }

    async fn find_by_id(&self, activity_id: ActivityId) -> Result<Option<Activity>> {
        Ok(self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?
            .rows
            .get(&activity_id.as_i64())
            .cloned())
    }

    async fn is_open_for_checkin(&self, activity_id: ActivityId) -> Result<bool> {
        Ok(self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?
            .rows
            .get(&activity_id.as_i64())
            .is_some_and(|a| a.status == ActivityStatus::Active))
    }

    async fn list_by_event(&self, event_id: EventId) -> Result<Vec<Activity>> {
        Ok(self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?
            .rows
            .values()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn advance_status(
        &self,
        activity_id: ActivityId,
        to: ActivityStatus,
    ) -> Result<Activity> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?;

        let Some(activity) = inner.rows.get_mut(&activity_id.as_i64()) else {
            return Err(CheckinError::ReferenceNotFound {
                entity: "activity",
                id: activity_id.as_i64(),
            });
        };

        if to <= activity.status {
            return Err(CheckinError::InvalidStatusTransition {
                from: activity.status,
                to,
            });
        }

        activity.status = to;
        Ok(activity.clone())
    }

    async fn add_prerequisite(
        &self,
        activity_id: ActivityId,
        prerequisite_id: ActivityId,
    ) -> Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?;

        for id in [activity_id, prerequisite_id] {
            if !inner.rows.contains_key(&id.as_i64()) {
                return Err(CheckinError::ReferenceNotFound {
                    entity: "activity",
                    id: id.as_i64(),
                });
            }
        }

        if activity_id == prerequisite_id || inner.would_cycle(activity_id, prerequisite_id) {
            return Err(CheckinError::PrerequisiteCycle);
        }

        let Some(activity) = inner.rows.get_mut(&activity_id.as_i64()) else {
            return Err(CheckinError::ReferenceNotFound {
                entity: "activity",
                id: activity_id.as_i64(),
            });
        };
        if !activity.prerequisites.contains(&prerequisite_id) {
            activity.prerequisites.push(prerequisite_id);
        }
        Ok(())
    }
}
