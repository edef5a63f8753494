//! Concrete store implementations.
//!
//! Each store is an explicit object owning a handle to a shared connection
//! pool, passed by reference into the engine. There is no process-wide
//! database state: a connection is acquired and released within each
//! operation.

pub mod sqlite;

pub use sqlite::{
    SqliteActivityRepository, SqliteAttendanceLedger, SqliteEventDirectory,
    SqliteParticipantRepository,
};
