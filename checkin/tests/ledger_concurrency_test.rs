//! Ledger concurrency tests.
//!
//! Verifies the atomic check-then-insert: N racing scans of the same
//! participant and activity produce exactly one stored record, with every
//! loser observing the winner's record.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use checkin::mocks::{
    MockActivityRepository, MockAttendanceLedger, MockEventDirectory, MockParticipantRepository,
};
use checkin::providers::{
    ActivityRepository, AttendanceLedger, CheckinInsert, EventDirectory, ParticipantRepository,
};
use checkin::types::{ActivityStatus, NewParticipant};
use checkin::{CheckinEngine, ScanOutcome};
use chrono::Utc;
use futures::future::join_all;

struct Seeded {
    participants: MockParticipantRepository,
    activities: MockActivityRepository,
    ledger: MockAttendanceLedger,
    participant: checkin::Participant,
    activity: checkin::Activity,
}

async fn seeded() -> Seeded {
    let events = MockEventDirectory::new();
    let participants = MockParticipantRepository::new(events.clone());
    let activities = MockActivityRepository::new(events.clone());
    let ledger = MockAttendanceLedger::new(participants.clone(), activities.clone());

    let event = events.create_event("Spring Hackathon").await.unwrap();
    let participant = participants
        .register(NewParticipant {
            display_name: "hestey".to_string(),
            given_name: "Hayden".to_string(),
            family_name: "Estey".to_string(),
            event_id: event.event_id,
        })
        .await
        .unwrap();
    let activity = activities
        .create_activity("Opening Session", event.event_id, ActivityStatus::Active)
        .await
        .unwrap();

    Seeded {
        participants,
        activities,
        ledger,
        participant,
        activity,
    }
}

#[tokio::test]
async fn sequential_duplicate_is_idempotent() {
    let seeded = seeded().await;

    let first = seeded
        .ledger
        .record_checkin(
            seeded.participant.participant_id,
            seeded.activity.activity_id,
            Utc::now(),
        )
        .await
        .unwrap();
    let second = seeded
        .ledger
        .record_checkin(
            seeded.participant.participant_id,
            seeded.activity.activity_id,
            Utc::now(),
        )
        .await
        .unwrap();

    let CheckinInsert::Recorded(original) = first else {
        panic!("expected Recorded, got {first:?}");
    };
    let CheckinInsert::AlreadyCheckedIn(existing) = second else {
        panic!("expected AlreadyCheckedIn, got {second:?}");
    };
    assert_eq!(original, existing);

    let stored = seeded
        .ledger
        .list_by_activity(seeded.activity.activity_id)
        .await
        .unwrap();
    assert_eq!(stored, vec![original]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_checkins_insert_exactly_once() {
    const ATTEMPTS: usize = 16;

    let seeded = seeded().await;

    let tasks = (0..ATTEMPTS).map(|_| {
        let ledger = seeded.ledger.clone();
        let participant_id = seeded.participant.participant_id;
        let activity_id = seeded.activity.activity_id;
        tokio::spawn(async move {
            ledger
                .record_checkin(participant_id, activity_id, Utc::now())
                .await
        })
    });

    let outcomes: Vec<CheckinInsert> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let recorded: Vec<_> = outcomes
        .iter()
        .filter(|o| matches!(o, CheckinInsert::Recorded(_)))
        .collect();
    assert_eq!(recorded.len(), 1);
    assert_eq!(outcomes.len(), ATTEMPTS);

    // Every loser observed the winner's record.
    let winner = recorded[0].record();
    for outcome in &outcomes {
        assert_eq!(outcome.record().checkin_id, winner.checkin_id);
    }

    let stored = seeded
        .ledger
        .list_by_activity(seeded.activity.activity_id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_scans_through_the_engine_record_once() {
    const STATIONS: usize = 8;

    let seeded = seeded().await;
    let engine = CheckinEngine::new(
        seeded.participants.clone(),
        seeded.activities.clone(),
        seeded.ledger.clone(),
    );

    let tasks = (0..STATIONS).map(|_| {
        let engine = engine.clone();
        let token = seeded.participant.public_token.clone();
        let activity_id = seeded.activity.activity_id;
        tokio::spawn(async move { engine.submit_scan(activity_id, Some(token.as_str())).await })
    });

    let outcomes: Vec<ScanOutcome> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let checked_in = outcomes
        .iter()
        .filter(|o| matches!(o, ScanOutcome::CheckedIn { .. }))
        .count();
    let already = outcomes
        .iter()
        .filter(|o| matches!(o, ScanOutcome::AlreadyCheckedIn { .. }))
        .count();
    assert_eq!(checked_in, 1);
    assert_eq!(already, STATIONS - 1);

    let stored = seeded
        .ledger
        .list_by_activity(seeded.activity.activity_id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}
