//! Integration tests for the royalty ledger repository.

use chrono::{TimeZone, Utc};
use royalty_core::money::Money;
use royalty_core::period::AccountingPeriod;
use royalty_db::models::release::CreateRelease;
use royalty_db::models::track::CreateTrack;
use royalty_db::models::user::CreateUser;
use royalty_db::repositories::{ReleaseRepo, RoyaltyRepo, TrackRepo, UserRepo};
use sqlx::PgPool;

/// Seed one artist, one release, and one track. Returns `(artist_id, track_id)`.
async fn seed_track(pool: &PgPool) -> (i64, i64) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "nova".to_string(),
            email: "nova@example.com".to_string(),
            role: None,
        },
    )
    .await
    .unwrap();
    let release = ReleaseRepo::create(
        pool,
        &CreateRelease {
            artist_id: user.id,
            title: "First Light".to_string(),
            release_date: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            cover_url: None,
            audio_url: None,
        },
    )
    .await
    .unwrap();
    let track = TrackRepo::create(
        pool,
        &CreateTrack {
            release_id: release.id,
            title: "Opening".to_string(),
            duration: 200,
            isrc: None,
            file_url: "https://cdn.example.com/opening.mp3".to_string(),
            streams: Some(100),
        },
    )
    .await
    .unwrap();
    (user.id, track.id)
}

fn march() -> AccountingPeriod {
    AccountingPeriod::new(2024, 3).unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_inserts_then_overwrites(pool: PgPool) {
    let (artist_id, track_id) = seed_track(&pool).await;

    let first = RoyaltyRepo::upsert(&pool, track_id, march(), Money::from_cents(100), artist_id)
        .await
        .unwrap();
    let second = RoyaltyRepo::upsert(&pool, track_id, march(), Money::from_cents(250), artist_id)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.period, "2024-03");
    assert_eq!(second.amount, Money::from_cents(250));
    assert_eq!(RoyaltyRepo::count_for_track(&pool, track_id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_new_period_adds_row_newest_first(pool: PgPool) {
    let (artist_id, track_id) = seed_track(&pool).await;

    RoyaltyRepo::upsert(&pool, track_id, march(), Money::from_cents(100), artist_id)
        .await
        .unwrap();
    RoyaltyRepo::upsert(&pool, track_id, march().next(), Money::from_cents(180), artist_id)
        .await
        .unwrap();

    let rows = RoyaltyRepo::list_by_track(&pool, track_id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].period, "2024-04");
    assert_eq!(rows[0].track_title, "Opening");
    assert_eq!(rows[0].artist_name, "nova");
    assert_eq!(rows[1].amount, Money::from_cents(100));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ledger_rows_cascade_with_track(pool: PgPool) {
    let (artist_id, track_id) = seed_track(&pool).await;
    RoyaltyRepo::upsert(&pool, track_id, march(), Money::from_cents(100), artist_id)
        .await
        .unwrap();

    TrackRepo::delete(&pool, track_id).await.unwrap();

    assert_eq!(RoyaltyRepo::count_for_track(&pool, track_id).await.unwrap(), 0);
    assert!(RoyaltyRepo::list_by_artist(&pool, artist_id)
        .await
        .unwrap()
        .is_empty());
}
