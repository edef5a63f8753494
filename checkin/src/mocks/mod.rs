//! Mock providers for testing.
//!
//! In-memory implementations with the same observable semantics as the
//! SQLite stores, including referential validation: the mocks compose, so
//! the ledger consults the participant and activity mocks it was built
//! from.
//!
//! ```
//! use checkin::mocks::{
//!     MockActivityRepository, MockAttendanceLedger, MockEventDirectory,
//!     MockParticipantRepository,
//! };
//!
//! let events = MockEventDirectory::new();
//! let participants = MockParticipantRepository::new(events.clone());
//! let activities = MockActivityRepository::new(events.clone());
//! let ledger = MockAttendanceLedger::new(participants.clone(), activities.clone());
//! ```

pub mod activities;
pub mod decoder;
pub mod events;
pub mod ledger;
pub mod participants;

pub use activities::MockActivityRepository;
pub use decoder::MockTokenDecoder;
pub use events::MockEventDirectory;
pub use ledger::MockAttendanceLedger;
pub use participants::MockParticipantRepository;
