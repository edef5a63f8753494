//! Participant repository trait.

use crate::error::Result;
use crate::types::{NewParticipant, Participant, ParticipantId, ProfileUpdate};

/// Durable storage and lookup of participants.
pub trait ParticipantRepository: Send + Sync {
    /// Register a participant, issuing a fresh globally unique public token.
    ///
    /// Returns the fully populated participant including the assigned id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `profile.event_id` refers to no known event → `ReferenceNotFound`
    /// - The insert fails → `Database`
    async fn register(&self, profile: NewParticipant) -> Result<Participant>;

    /// Exact-match lookup by public token.
    ///
    /// A missing token is `Ok(None)`: it is the expected, common case while
    /// scanning, not an error.
    ///
    /// # Errors
    ///
    /// Returns error only if the query itself fails.
    async fn find_by_token(&self, token: &str) -> Result<Option<Participant>>;

    /// Look up a participant by id.
    ///
    /// # Errors
    ///
    /// Returns error only if the query itself fails.
    async fn find_by_id(&self, participant_id: ParticipantId) -> Result<Option<Participant>>;

    /// Substring search on family name, ASCII case-insensitive.
    ///
    /// Results come back in storage order; no externally meaningful order is
    /// guaranteed.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn search_by_family_name(&self, needle: &str) -> Result<Vec<Participant>>;

    /// All registered participants, in storage order.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn list_all(&self) -> Result<Vec<Participant>>;

    /// Partial update of the mutable profile fields.
    ///
    /// Fields left `None` are unchanged. Returns the updated participant.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The participant does not exist → `ReferenceNotFound`
    /// - The update fails → `Database`
    async fn update_profile(
        &self,
        participant_id: ParticipantId,
        update: ProfileUpdate,
    ) -> Result<Participant>;
}
