//! Mock event directory.

use crate::error::{CheckinError, Result};
use crate::providers::EventDirectory;
use crate::types::{Event, EventId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<i64, Event>,
}

/// Mock event directory backed by in-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MockEventDirectory {
    inner: Arc<Mutex<Inner>>,
}

impl MockEventDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventDirectory for MockEventDirectory {
    async fn create_event(&self, name: &str) -> Result<Event> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?;

        inner.next_id += 1;
        let id = inner.next_id;
        let event = Event {
            event_id: EventId::from_i64(id),
            name: name.to_string(),
        };
        inner.rows.insert(id, event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, event_id: EventId) -> Result<Option<Event>> {
        Ok(self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?
            .rows
            .get(&event_id.as_i64())
            .cloned())
    }
}
