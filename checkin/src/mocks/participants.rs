//! Mock participant repository.

use super::MockEventDirectory;
use crate::error::{CheckinError, Result};
use crate::providers::{EventDirectory, ParticipantRepository};
use crate::types::{
    NewParticipant, Participant, ParticipantId, ProfileUpdate, PublicToken,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<i64, Participant>,
    by_token: HashMap<String, i64>,
}

/// Mock participant repository backed by in-memory storage.
///
/// Registration validates the owning event against the
/// [`MockEventDirectory`] it was built from.
#[derive(Debug, Clone)]
pub struct MockParticipantRepository {
    events: MockEventDirectory,
    inner: Arc<Mutex<Inner>>,
}

impl MockParticipantRepository {
    /// Create an empty repository validating against `events`.
    #[must_use]
    pub fn new(events: MockEventDirectory) -> Self {
        Self {
            events,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }
}

impl ParticipantRepository for MockParticipantRepository {
    async fn register(&self, profile: NewParticipant) -> Result<Participant> {
        if self.events.find_by_id(profile.event_id).await?.is_none() {
            return Err(CheckinError::ReferenceNotFound {
                entity: "event",
                id: profile.event_id.as_i64(),
            });
        }

        let mut inner = self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?;

        inner.next_id += 1;
        let id = inner.next_id;
        let token = PublicToken::issue();
        let participant = Participant {
            participant_id: ParticipantId::from_i64(id),
            public_token: token.clone(),
            display_name: profile.display_name,
            given_name: profile.given_name,
            family_name: profile.family_name,
            event_id: profile.event_id,
        };
        inner.rows.insert(id, participant.clone());
        inner.by_token.insert(token.as_str().to_string(), id);
        Ok(participant)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Participant>> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?;

        Ok(inner
            .by_token
            .get(token)
            .and_then(|id| inner.rows.get(id))
            .cloned())
    }

    async fn find_by_id(&self, participant_id: ParticipantId) -> Result<Option<Participant>> {
        Ok(self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?
            .rows
            .get(&participant_id.as_i64())
            .cloned())
    }

    async fn search_by_family_name(&self, needle: &str) -> Result<Vec<Participant>> {
        let needle = needle.to_ascii_lowercase();
        Ok(self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?
            .rows
            .values()
            .filter(|p| p.family_name.to_ascii_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Participant>> {
        Ok(self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?
            .rows
            .values()
            .cloned()
            .collect())
    }

    async fn update_profile(
        &self,
        participant_id: ParticipantId,
        update: ProfileUpdate,
    ) -> Result<Participant> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| CheckinError::Internal("lock poisoned".to_string()))?;

        let Some(participant) = inner.rows.get_mut(&participant_id.as_i64()) else {
            return Err(CheckinError::ReferenceNotFound {
                entity: "participant",
                id: participant_id.as_i64(),
            });
        };

        if let Some(display_name) = update.display_name {
            participant.display_name = display_name;
        }
        if let Some(given_name) = update.given_name {
            participant.given_name = given_name;
        }
        if let Some(family_name) = update.family_name {
            participant.family_name = family_name;
        }

        Ok(participant.clone())
    }
}
