//! Error types for check-in storage and orchestration.

use crate::types::ActivityStatus;
use thiserror::Error;

/// Result type alias for check-in operations.
pub type Result<T> = std::result::Result<T, CheckinError>;

/// Error taxonomy for the check-in core.
///
/// Lookup misses are deliberately absent: "token not found" and "already
/// checked in" are expected outcomes, modeled as `Option` and
/// [`crate::providers::CheckinInsert`] respectively, never as errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckinError {
    /// A foreign-key target is missing: caller bug or stale state.
    #[error("{entity} {id} not found")]
    ReferenceNotFound {
        /// Kind of entity that was referenced ("event", "participant", ...).
        entity: &'static str,
        /// The dangling identifier.
        id: i64,
    },

    /// Activity status may only move forward through
    /// `upcoming -> active -> closed`.
    #[error("activity status cannot change from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: ActivityStatus,
        /// Rejected target status.
        to: ActivityStatus,
    },

    /// Adding the prerequisite edge would make the prerequisite graph cyclic.
    #[error("prerequisite would create a cycle")]
    PrerequisiteCycle,

    /// Underlying storage unavailable or a constraint unexpectedly violated.
    #[error("database error: {0}")]
    Database(String),

    /// Invariant violation inside the process (poisoned lock, corrupt state).
    #[error("internal error: {0}")]
    Internal(String),
}

impl CheckinError {
    /// Returns `true` if this error indicates stale or invalid caller state
    /// rather than a storage fault.
    #[must_use]
    pub const fn is_reference_error(&self) -> bool {
        matches!(self, Self::ReferenceNotFound { .. })
    }

    /// Returns `true` if this error came from the storage layer.
    #[must_use]
    pub const fn is_storage_error(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}
