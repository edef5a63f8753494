//! Event directory trait.

use crate::error::Result;
use crate::types::{Event, EventId};

/// Minimal directory of events.
///
/// Event administration is a collaborator concern; this core only needs
/// enough to validate the `event_id` references carried by participants and
/// activities.
pub trait EventDirectory: Send + Sync {
    /// Create an event and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    async fn create_event(&self, name: &str) -> Result<Event>;

    /// Look up an event by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. A missing event is `Ok(None)`.
    async fn find_by_id(&self, event_id: EventId) -> Result<Option<Event>>;
}
