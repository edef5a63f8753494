//! Repository and collaborator traits.
//!
//! This module defines traits for everything the check-in engine depends on.
//! Providers are **interfaces**, not implementations: the engine depends on
//! these traits, and the caller wires in concrete implementations.
//!
//! This enables:
//! - **Testing**: in-memory mocks, deterministic and fast
//! - **Production**: the SQLite stores in [`crate::stores`]
//! - **Isolation**: the decoder stays an external collaborator behind a
//!   one-method contract

pub mod activities;
pub mod decoder;
pub mod events;
pub mod ledger;
pub mod participants;

pub use activities::ActivityRepository;
pub use decoder::TokenDecoder;
pub use events::EventDirectory;
pub use ledger::{AttendanceLedger, CheckinInsert};
pub use participants::ParticipantRepository;
