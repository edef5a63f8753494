//! Scanning-station walkthrough.
//!
//! Stands in for the out-of-scope GUI: wires the SQLite stores and the
//! check-in engine together, registers a couple of participants, and runs
//! simulated scans through the decoder boundary.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin kiosk
//! ```

use anyhow::Context;
use checkin::mocks::MockTokenDecoder;
use checkin::providers::{
    ActivityRepository, AttendanceLedger, EventDirectory, ParticipantRepository,
};
use checkin::stores::sqlite::{
    self, SqliteActivityRepository, SqliteAttendanceLedger, SqliteEventDirectory,
    SqliteParticipantRepository,
};
use checkin::types::{ActivityStatus, NewParticipant};
use checkin::{CheckinEngine, DatabaseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,checkin=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n============================================");
    println!("   Attendance Check-in - Kiosk Demo");
    println!("============================================\n");

    let pool = sqlite::connect(&DatabaseConfig::in_memory())
        .await
        .context("failed to open database")?;
    sqlite::migrate(&pool).await.context("migration failed")?;

    let events = SqliteEventDirectory::new(pool.clone());
    let participants = SqliteParticipantRepository::new(pool.clone());
    let activities = SqliteActivityRepository::new(pool.clone());
    let ledger = SqliteAttendanceLedger::new(pool);
    let engine = CheckinEngine::new(participants.clone(), activities.clone(), ledger.clone());

    // Administrative setup: one event, one open activity, one not yet open.
    println!("1. Seeding event and activities...");
    let event = events.create_event("Spring Hackathon").await?;
    let opening = activities
        .create_activity("Opening Session", event.event_id, ActivityStatus::Active)
        .await?;
    let ceremony = activities
        .create_activity("Closing Ceremony", event.event_id, ActivityStatus::Upcoming)
        .await?;
    println!(
        "   event '{}' with activities '{}' (active) and '{}' (upcoming)\n",
        event.name, opening.name, ceremony.name
    );

    println!("2. Registering participants...");
    let ada = participants
        .register(NewParticipant {
            display_name: "alovelace".to_string(),
            given_name: "Ada".to_string(),
            family_name: "Lovelace".to_string(),
            event_id: event.event_id,
        })
        .await?;
    let grace = participants
        .register(NewParticipant {
            display_name: "ghopper".to_string(),
            given_name: "Grace".to_string(),
            family_name: "Hopper".to_string(),
            event_id: event.event_id,
        })
        .await?;
    println!("   {} -> token {}", ada.display_name, ada.public_token);
    println!("   {} -> token {}\n", grace.display_name, grace.public_token);

    // The decoder collaborator: two frames carry valid badges, one carries
    // a stale badge from another system, one is an empty viewfinder shot.
    let decoder = MockTokenDecoder::new();
    decoder.register_symbol(b"badge-ada", ada.public_token.as_str())?;
    decoder.register_symbol(b"badge-grace", grace.public_token.as_str())?;
    decoder.register_symbol(b"badge-stale", "00000000-dead-beef-0000-000000000000")?;

    println!("3. Scanning at the '{}' station...", opening.name);
    let frames: [(&str, &[u8]); 5] = [
        ("Ada's badge", b"badge-ada"),
        ("Ada's badge again", b"badge-ada"),
        ("Grace's badge", b"badge-grace"),
        ("a stale badge", b"badge-stale"),
        ("an empty viewfinder", b"no-symbol-here"),
    ];
    for (label, frame) in frames {
        let outcome = engine
            .scan_image(&decoder, opening.activity_id, frame)
            .await?;
        println!("   scan of {label}: {}", outcome.operator_message());
    }

    println!("\n4. Scanning at the '{}' station (not yet open)...", ceremony.name);
    let outcome = engine
        .scan_image(&decoder, ceremony.activity_id, b"badge-ada")
        .await?;
    println!("   scan of Ada's badge: {}", outcome.operator_message());

    println!("\n5. Attendance for '{}':", opening.name);
    for record in ledger.list_by_activity(opening.activity_id).await? {
        let name = participants
            .find_by_id(record.participant_id)
            .await?
            .map_or_else(|| record.participant_id.to_string(), |p| p.display_name);
        println!("   {} at {}", name, record.checked_in_at);
    }

    println!("\nDone.");
    Ok(())
}
