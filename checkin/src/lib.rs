//! # Attendance Check-in Core
//!
//! Turns "a token was scanned" into "attendance is correctly and durably
//! recorded, or a precise reason why not".
//!
//! ## Architecture
//!
//! ```text
//! Decoder ──token──▶ CheckinEngine ──▶ ParticipantRepository (resolve)
//!                         │──────────▶ ActivityRepository    (validate)
//!                         └──────────▶ AttendanceLedger      (record once)
//! ```
//!
//! The engine is invoked synchronously, once per scan. The stores are safe
//! under concurrent access from multiple scanning stations; the ledger's
//! check-then-insert is atomic, so re-scanning a participant never produces
//! a second record.
//!
//! ## Example
//!
//! ```
//! use checkin::mocks::{
//!     MockActivityRepository, MockAttendanceLedger, MockEventDirectory,
//!     MockParticipantRepository,
//! };
//! use checkin::providers::{ActivityRepository, EventDirectory, ParticipantRepository};
//! use checkin::types::{ActivityStatus, NewParticipant};
//! use checkin::{CheckinEngine, ScanOutcome};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> checkin::Result<()> {
//! let events = MockEventDirectory::new();
//! let participants = MockParticipantRepository::new(events.clone());
//! let activities = MockActivityRepository::new(events.clone());
//! let ledger = MockAttendanceLedger::new(participants.clone(), activities.clone());
//!
//! let event = events.create_event("Spring Hackathon").await?;
//! let activity = activities
//!     .create_activity("Opening Session", event.event_id, ActivityStatus::Active)
//!     .await?;
//! let participant = participants
//!     .register(NewParticipant {
//!         display_name: "hestey".to_string(),
//!         given_name: "Hayden".to_string(),
//!         family_name: "Estey".to_string(),
//!         event_id: event.event_id,
//!     })
//!     .await?;
//!
//! let engine = CheckinEngine::new(participants, activities, ledger);
//! let outcome = engine
//!     .submit_scan(activity.activity_id, Some(participant.public_token.as_str()))
//!     .await?;
//! assert!(matches!(outcome, ScanOutcome::CheckedIn { .. }));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod engine;
pub mod error;
pub mod providers;
pub mod stores;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use config::{Config, DatabaseConfig};
pub use engine::{CheckinEngine, IneligibilityReason, NotFoundReason, ScanOutcome};
pub use error::{CheckinError, Result};
pub use types::{
    Activity, ActivityId, ActivityStatus, CheckinId, CheckinRecord, Event, EventId,
    NewParticipant, Participant, ParticipantId, ProfileUpdate, PublicToken,
};
