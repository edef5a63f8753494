//! The check-in engine.
//!
//! Orchestrates one scan attempt: token resolution, eligibility validation,
//! and the ledger write. This is the only component with business rules;
//! everything it touches sits behind the traits in [`crate::providers`].
//!
//! Each attempt moves through resolving, validating, and recording, and ends
//! in one of five terminal outcomes: the four [`ScanOutcome`] variants, or a
//! storage failure surfaced as the `Err` arm of the returned `Result`.

use crate::error::{CheckinError, Result};
use crate::providers::{
    ActivityRepository, AttendanceLedger, CheckinInsert, ParticipantRepository, TokenDecoder,
};
use crate::types::{ActivityId, ActivityStatus, CheckinRecord, Participant};
use chrono::Utc;
use tracing::{debug, info, warn};

/// Why a scan did not resolve to a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The decoder found no symbol in the captured image.
    NoSymbolFound,

    /// A token was decoded but matches no registered participant.
    UnknownToken {
        /// The decoded token, for operator diagnostics.
        token: String,
    },
}

/// Why the presented activity rejected the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IneligibilityReason {
    /// The activity is not currently open for check-in.
    NotOpen {
        /// The activity's current status.
        status: ActivityStatus,
    },

    /// The participant is registered under a different event than the
    /// activity belongs to.
    EventMismatch,
}

/// Terminal outcome of one scan attempt.
///
/// Every variant maps to exactly one operator-visible message category; see
/// [`ScanOutcome::operator_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A new check-in was recorded.
    CheckedIn {
        /// The resolved participant, for operator confirmation.
        participant: Participant,
        /// The freshly stored record.
        record: CheckinRecord,
    },

    /// The participant was already checked into this activity. Benign; no
    /// write occurred.
    AlreadyCheckedIn {
        /// The resolved participant.
        participant: Participant,
        /// The previously stored record.
        record: CheckinRecord,
    },

    /// The scan resolved to no participant.
    ParticipantNotFound {
        /// What went missing.
        reason: NotFoundReason,
    },

    /// The participant is known but this activity may not be checked into.
    ActivityNotEligible {
        /// Why the activity rejected the scan.
        reason: IneligibilityReason,
    },
}

impl ScanOutcome {
    /// One human-readable message per outcome category.
    #[must_use]
    pub fn operator_message(&self) -> String {
        match self {
            Self::CheckedIn { participant, .. } => {
                format!("Checked in {}.", participant.display_name)
            }
            Self::AlreadyCheckedIn { participant, .. } => {
                format!("{} is already checked in.", participant.display_name)
            }
            Self::ParticipantNotFound {
                reason: NotFoundReason::NoSymbolFound,
            } => "No symbols found.".to_string(),
            Self::ParticipantNotFound {
                reason: NotFoundReason::UnknownToken { .. },
            } => "No participant matches the scanned code.".to_string(),
            Self::ActivityNotEligible { .. } => {
                "This activity is not open for check-in.".to_string()
            }
        }
    }
}

/// The check-in orchestration layer.
///
/// Holds clonable handles to the three stores; the stores own their
/// connections, so the engine itself carries no storage state.
#[derive(Debug, Clone)]
pub struct CheckinEngine<P, A, L>
where
    P: ParticipantRepository + Clone,
    A: ActivityRepository + Clone,
    L: AttendanceLedger + Clone,
{
    participants: P,
    activities: A,
    ledger: L,
}

impl<P, A, L> CheckinEngine<P, A, L>
where
    P: ParticipantRepository + Clone,
    A: ActivityRepository + Clone,
    L: AttendanceLedger + Clone,
{
    /// Create an engine over the given stores.
    #[must_use]
    pub const fn new(participants: P, activities: A, ledger: L) -> Self {
        Self {
            participants,
            activities,
            ledger,
        }
    }

    /// Process one scan attempt against the activity currently presented in
    /// the scanning station.
    ///
    /// `decoded` is the decoder's output: `None` (or an empty string) means
    /// no symbol was found. Exactly one ledger insert happens on the
    /// [`ScanOutcome::CheckedIn`] path; zero on every other.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `activity_id` refers to no known activity → `ReferenceNotFound`
    ///   (stale caller state, not a scan outcome)
    /// - Storage fails → `Database`
    #[tracing::instrument(skip(self, decoded), fields(activity = %activity_id))]
    pub async fn submit_scan(
        &self,
        activity_id: ActivityId,
        decoded: Option<&str>,
    ) -> Result<ScanOutcome> {
        let token = match decoded {
            None | Some("") => {
                debug!("no symbol decoded");
                return Ok(ScanOutcome::ParticipantNotFound {
                    reason: NotFoundReason::NoSymbolFound,
                });
            }
            Some(token) => token,
        };

        let Some(participant) = self.participants.find_by_token(token).await? else {
            debug!("decoded token matches no participant");
            return Ok(ScanOutcome::ParticipantNotFound {
                reason: NotFoundReason::UnknownToken {
                    token: token.to_string(),
                },
            });
        };

        let Some(activity) = self.activities.find_by_id(activity_id).await? else {
            return Err(CheckinError::ReferenceNotFound {
                entity: "activity",
                id: activity_id.as_i64(),
            });
        };

        if activity.status != ActivityStatus::Active {
            debug!(status = %activity.status, "activity not open for check-in");
            return Ok(ScanOutcome::ActivityNotEligible {
                reason: IneligibilityReason::NotOpen {
                    status: activity.status,
                },
            });
        }
        if participant.event_id != activity.event_id {
            debug!(
                participant_event = %participant.event_id,
                activity_event = %activity.event_id,
                "participant belongs to a different event"
            );
            return Ok(ScanOutcome::ActivityNotEligible {
                reason: IneligibilityReason::EventMismatch,
            });
        }

        let insert = self
            .ledger
            .record_checkin(participant.participant_id, activity_id, Utc::now())
            .await
            .map_err(|e| {
                if e.is_reference_error() {
                    // Both references were validated above and neither entity
                    // is ever deleted, so this indicates a consistency bug.
                    warn!(error = %e, "ledger rejected validated references");
                    CheckinError::Database(format!("ledger consistency fault: {e}"))
                } else {
                    e
                }
            })?;

        match insert {
            CheckinInsert::Recorded(record) => {
                info!(participant = %participant.participant_id, "checked in");
                Ok(ScanOutcome::CheckedIn {
                    participant,
                    record,
                })
            }
            CheckinInsert::AlreadyCheckedIn(record) => {
                debug!(participant = %participant.participant_id, "duplicate scan");
                Ok(ScanOutcome::AlreadyCheckedIn {
                    participant,
                    record,
                })
            }
        }
    }

    /// Decode a captured frame and feed the result through
    /// [`CheckinEngine::submit_scan`].
    ///
    /// # Errors
    ///
    /// Returns error if the decoder fails or [`CheckinEngine::submit_scan`]
    /// does.
    pub async fn scan_image<D: TokenDecoder>(
        &self,
        decoder: &D,
        activity_id: ActivityId,
        image: &[u8],
    ) -> Result<ScanOutcome> {
        let decoded = decoder.decode(image)?;
        self.submit_scan(activity_id, decoded.as_deref()).await
    }
}
