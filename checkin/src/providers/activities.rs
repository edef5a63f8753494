//! Activity repository trait.

use crate::error::Result;
use crate::types::{Activity, ActivityId, ActivityStatus, EventId};

/// Durable storage and lookup of activities.
pub trait ActivityRepository: Send + Sync {
    /// Create an activity under an event.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `event_id` refers to no known event → `ReferenceNotFound`
    /// - The insert fails → `Database`
    async fn create_activity(
        &self,
        name: &str,
        event_id: EventId,
        status: ActivityStatus,
    ) -> Result<Activity>;

    /// Look up an activity by id, prerequisites included.
    ///
    /// # Errors
    ///
    /// Returns error only if the query itself fails.
    async fn find_by_id(&self, activity_id: ActivityId) -> Result<Option<Activity>>;

    /// Eligibility gate: `true` only when the activity exists and its status
    /// is [`ActivityStatus::Active`].
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn is_open_for_checkin(&self, activity_id: ActivityId) -> Result<bool>;

    /// All activities belonging to an event, in storage order.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list_by_event(&self, event_id: EventId) -> Result<Vec<Activity>>;

    /// Move an activity's status forward.
    ///
    /// Only strictly forward moves in `upcoming -> active -> closed` are
    /// accepted; `upcoming -> closed` is a legal administrative shortcut.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The activity does not exist → `ReferenceNotFound`
    /// - The move is backward or a no-op → `InvalidStatusTransition`
    /// - The update fails → `Database`
    async fn advance_status(&self, activity_id: ActivityId, to: ActivityStatus)
    -> Result<Activity>;

    /// Record that `prerequisite_id` must be completed before `activity_id`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Either activity does not exist → `ReferenceNotFound`
    /// - The edge is a self-reference or closes a cycle → `PrerequisiteCycle`
    /// - The insert fails → `Database`
    async fn add_prerequisite(
        &self,
        activity_id: ActivityId,
        prerequisite_id: ActivityId,
    ) -> Result<()>;
}
