//! Domain types for the attendance check-in system.
//!
//! Value objects only: every type here is returned by value from the stores,
//! which never retain references to data they hand back.

use crate::error::CheckinError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(i64);

impl EventId {
    /// Create an `EventId` from a raw database id.
    #[must_use]
    pub const fn from_i64(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw database id.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a participant.
///
/// Assigned by the identity store at registration; stable for the lifetime
/// of the participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(i64);

impl ParticipantId {
    /// Create a `ParticipantId` from a raw database id.
    #[must_use]
    pub const fn from_i64(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw database id.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivityId(i64);

impl ActivityId {
    /// Create an `ActivityId` from a raw database id.
    #[must_use]
    pub const fn from_i64(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw database id.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a check-in record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CheckinId(i64);

impl CheckinId {
    /// Create a `CheckinId` from a raw database id.
    #[must_use]
    pub const fn from_i64(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw database id.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CheckinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Public token
// ============================================================================

/// Opaque unique string identifying a participant, recovered from a scanned
/// code.
///
/// Issued once at registration and immutable afterwards. The scanner hands
/// the engine a raw decoded string; this type only wraps tokens the store
/// has vouched for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicToken(String);

impl PublicToken {
    /// Issue a fresh, globally unique token.
    #[must_use]
    pub fn issue() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wrap a token string loaded from storage.
    #[must_use]
    pub const fn from_string(token: String) -> Self {
        Self(token)
    }

    /// Get the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Activity status
// ============================================================================

/// Lifecycle status of an activity.
///
/// The derived ordering is the intended flow: status may only move forward
/// through `Upcoming < Active < Closed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    /// Not yet open for check-in.
    Upcoming,

    /// Open for check-in.
    Active,

    /// No longer accepting check-ins.
    Closed,
}

impl ActivityStatus {
    /// Canonical storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityStatus {
    type Err = CheckinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            other => Err(CheckinError::Database(format!(
                "unknown activity status '{other}'"
            ))),
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// An event under which participants register and activities run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event ID.
    pub event_id: EventId,

    /// Event name.
    pub name: String,
}

/// A registered participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant ID, assigned at registration.
    pub participant_id: ParticipantId,

    /// Opaque token printed into the participant's scannable code.
    pub public_token: PublicToken,

    /// Name shown to operators on a successful scan.
    pub display_name: String,

    /// Given name.
    pub given_name: String,

    /// Family name.
    pub family_name: String,

    /// Event this participant is registered under.
    pub event_id: EventId,
}

/// Profile fields for registering a new participant.
///
/// The store assigns `participant_id` and issues the public token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParticipant {
    /// Name shown to operators on a successful scan.
    pub display_name: String,

    /// Given name.
    pub given_name: String,

    /// Family name.
    pub family_name: String,

    /// Event to register under.
    pub event_id: EventId,
}

/// Partial update of a participant's mutable profile fields.
///
/// `participant_id`, `public_token`, and `event_id` are immutable and have
/// no counterpart here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New display name, if changing.
    pub display_name: Option<String>,

    /// New given name, if changing.
    pub given_name: Option<String>,

    /// New family name, if changing.
    pub family_name: Option<String>,
}

impl ProfileUpdate {
    /// `true` if the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.given_name.is_none() && self.family_name.is_none()
    }
}

/// An activity that participants can be checked into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Activity ID.
    pub activity_id: ActivityId,

    /// Activity name.
    pub name: String,

    /// Owning event.
    pub event_id: EventId,

    /// Lifecycle status.
    pub status: ActivityStatus,

    /// Activities that must be completed before this one. Acyclic.
    pub prerequisites: Vec<ActivityId>,
}

/// A durable record that a participant attended an activity.
///
/// Created exactly once per `(participant, activity)` pair and immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinRecord {
    /// Check-in ID.
    pub checkin_id: CheckinId,

    /// The participant who was checked in.
    pub participant_id: ParticipantId,

    /// The activity they were checked into.
    pub activity_id: ActivityId,

    /// When the check-in was recorded.
    pub checked_in_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [
            ActivityStatus::Upcoming,
            ActivityStatus::Active,
            ActivityStatus::Closed,
        ] {
            assert_eq!(status.as_str().parse::<ActivityStatus>().unwrap(), status);
        }
    }

    #[test]
    fn status_rejects_unknown_storage_form() {
        assert!("cancelled".parse::<ActivityStatus>().is_err());
    }

    #[test]
    fn status_order_follows_lifecycle() {
        assert!(ActivityStatus::Upcoming < ActivityStatus::Active);
        assert!(ActivityStatus::Active < ActivityStatus::Closed);
    }

    #[test]
    fn issued_tokens_are_distinct() {
        assert_ne!(PublicToken::issue(), PublicToken::issue());
    }
}
