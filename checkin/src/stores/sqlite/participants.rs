//! SQLite participant repository.

use super::event_exists;
use crate::error::{CheckinError, Result};
use crate::providers::ParticipantRepository;
use crate::types::{
    EventId, NewParticipant, Participant, ParticipantId, ProfileUpdate, PublicToken,
};
use sqlx::SqlitePool;

type ParticipantRow = (i64, String, String, String, String, i64);

fn participant_from_row(row: ParticipantRow) -> Participant {
    let (participant_id, public_token, display_name, given_name, family_name, event_id) = row;
    Participant {
        participant_id: ParticipantId::from_i64(participant_id),
        public_token: PublicToken::from_string(public_token),
        display_name,
        given_name,
        family_name,
        event_id: EventId::from_i64(event_id),
    }
}

/// SQLite-backed participant repository.
#[derive(Clone)]
pub struct SqliteParticipantRepository {
    pool: SqlitePool,
}

impl SqliteParticipantRepository {
    /// Create a new repository over a shared pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ParticipantRepository for SqliteParticipantRepository {
    async fn register(&self, profile: NewParticipant) -> Result<Participant> {
        if !event_exists(&self.pool, profile.event_id).await? {
            return Err(CheckinError::ReferenceNotFound {
                entity: "event",
                id: profile.event_id.as_i64(),
            });
        }

        let token = PublicToken::issue();
        let result = sqlx::query(
            "INSERT INTO participants
                 (public_token, display_name, given_name, family_name, event_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(token.as_str())
        .bind(&profile.display_name)
        .bind(&profile.given_name)
        .bind(&profile.family_name)
        .bind(profile.event_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    // Freshly issued UUIDs colliding means something is very wrong.
                    return CheckinError::Database("public token collision".to_string());
                }
            }
            CheckinError::Database(format!("failed to register participant: {e}"))
        })?;

        Ok(Participant {
            participant_id: ParticipantId::from_i64(result.last_insert_rowid()),
            public_token: token,
            display_name: profile.display_name,
            given_name: profile.given_name,
            family_name: profile.family_name,
            event_id: profile.event_id,
        })
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Participant>> {
        let row: Option<ParticipantRow> = sqlx::query_as(
            "SELECT participant_id, public_token, display_name, given_name, family_name, event_id
             FROM participants
             WHERE public_token = ?1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to look up token: {e}")))?;

        Ok(row.map(participant_from_row))
    }

    async fn find_by_id(&self, participant_id: ParticipantId) -> Result<Option<Participant>> {
        let row: Option<ParticipantRow> = sqlx::query_as(
            "SELECT participant_id, public_token, display_name, given_name, family_name, event_id
             FROM participants
             WHERE participant_id = ?1",
        )
        .bind(participant_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to get participant: {e}")))?;

        Ok(row.map(participant_from_row))
    }

    async fn search_by_family_name(&self, needle: &str) -> Result<Vec<Participant>> {
        // SQLite LIKE is case-insensitive for ASCII, which is the documented
        // search policy; the mock mirrors it.
        let rows: Vec<ParticipantRow> = sqlx::query_as(
            "SELECT participant_id, public_token, display_name, given_name, family_name, event_id
             FROM participants
             WHERE family_name LIKE '%' || ?1 || '%'",
        )
        .bind(needle)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to search participants: {e}")))?;

        Ok(rows.into_iter().map(participant_from_row).collect())
    }

    async fn list_all(&self) -> Result<Vec<Participant>> {
        let rows: Vec<ParticipantRow> = sqlx::query_as(
            "SELECT participant_id, public_token, display_name, given_name, family_name, event_id
             FROM participants",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to list participants: {e}")))?;

        Ok(rows.into_iter().map(participant_from_row).collect())
    }

    async fn update_profile(
        &self,
        participant_id: ParticipantId,
        update: ProfileUpdate,
    ) -> Result<Participant> {
        let Some(current) = self.find_by_id(participant_id).await? else {
            return Err(CheckinError::ReferenceNotFound {
                entity: "participant",
                id: participant_id.as_i64(),
            });
        };

        let display_name = update.display_name.unwrap_or(current.display_name);
        let given_name = update.given_name.unwrap_or(current.given_name);
        let family_name = update.family_name.unwrap_or(current.family_name);

        let result = sqlx::query(
            "UPDATE participants
             SET display_name = ?2,
                 given_name = ?3,
                 family_name = ?4
             WHERE participant_id = ?1",
        )
        .bind(participant_id.as_i64())
        .bind(&display_name)
        .bind(&given_name)
        .bind(&family_name)
        .execute(&self.pool)
        .await
        .map_err(|e| CheckinError::Database(format!("failed to update participant: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(CheckinError::ReferenceNotFound {
                entity: "participant",
                id: participant_id.as_i64(),
            });
        }

        Ok(Participant {
            participant_id: current.participant_id,
            public_token: current.public_token,
            display_name,
            given_name,
            family_name,
            event_id: current.event_id,
        })
    }
}
