//! Integration tests for booking persistence and calendar protection.

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use harbor_core::booking::{BookingStatus, DateRange};
use harbor_core::types::{DbId, Timestamp};
use harbor_db::models::asset::CreateAsset;
use harbor_db::models::booking::{CalendarKey, CreateBookingOutcome, NewBooking};
use harbor_db::models::user::CreateUser;
use harbor_db::repositories::{AssetRepo, BookingRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn june(day: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 6, day, 0, 0, 0).unwrap()
}

async fn user(pool: &PgPool, email: &str, role: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn asset(pool: &PgPool, owner_id: DbId) -> DbId {
    AssetRepo::create(
        pool,
        owner_id,
        &CreateAsset {
            name: "Aurora".to_string(),
            description: None,
            kind: "sailboat".to_string(),
            location: "Split".to_string(),
            capacity: 6,
            daily_price: 10_000,
            weekly_price: Some(60_000),
            skipper_required: false,
            skipper_available: true,
            skipper_daily_rate: Some(15_000),
            required_license_level: 0,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_booking(asset_id: DbId, renter_id: DbId, skipper_id: Option<DbId>, start: u32, end: u32) -> NewBooking {
    let range = DateRange::new(june(start), june(end)).unwrap();
    let days = range.billable_days();
    NewBooking {
        asset_id,
        renter_id,
        skipper_id,
        range,
        with_skipper: skipper_id.is_some(),
        days: days as i32,
        asset_price: days * 10_000,
        skipper_price: 0,
        extras_price: 0,
        total_price: days * 10_000,
        renter_license_level: None,
        renter_notes: None,
        extras: Vec::new(),
    }
}

struct Fixture {
    owner: DbId,
    renter: DbId,
    asset: DbId,
}

async fn fixture(pool: &PgPool) -> Fixture {
    let owner = user(pool, "owner@example.com", "owner").await;
    let renter = user(pool, "renter@example.com", "renter").await;
    let asset = asset(pool, owner).await;
    Fixture { owner, renter, asset }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn created_booking_carries_owner_and_requested_status(pool: PgPool) {
    let f = fixture(&pool).await;

    let outcome = BookingRepo::create_checked(&pool, &new_booking(f.asset, f.renter, None, 1, 5))
        .await
        .unwrap();

    let booking = assert_matches!(outcome, CreateBookingOutcome::Created(b) => b);
    assert_eq!(booking.owner_id, f.owner);
    assert_eq!(booking.status(), BookingStatus::Requested);
    assert_eq!(booking.days, 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn shared_boundary_is_reported_as_unavailable(pool: PgPool) {
    let f = fixture(&pool).await;
    BookingRepo::create_checked(&pool, &new_booking(f.asset, f.renter, None, 1, 5))
        .await
        .unwrap();

    let outcome = BookingRepo::create_checked(&pool, &new_booking(f.asset, f.renter, None, 5, 10))
        .await
        .unwrap();

    let conflicts = assert_matches!(outcome, CreateBookingOutcome::AssetUnavailable(c) => c);
    assert_eq!(conflicts.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn day_after_is_free(pool: PgPool) {
    let f = fixture(&pool).await;
    BookingRepo::create_checked(&pool, &new_booking(f.asset, f.renter, None, 1, 5))
        .await
        .unwrap();

    let outcome = BookingRepo::create_checked(&pool, &new_booking(f.asset, f.renter, None, 6, 10))
        .await
        .unwrap();

    assert_matches!(outcome, CreateBookingOutcome::Created(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn busy_skipper_blocks_other_assets(pool: PgPool) {
    let f = fixture(&pool).await;
    let skipper = user(&pool, "skipper@example.com", "skipper").await;
    let second_asset = asset(&pool, f.owner).await;

    BookingRepo::create_checked(&pool, &new_booking(f.asset, f.renter, Some(skipper), 1, 5))
        .await
        .unwrap();

    let outcome = BookingRepo::create_checked(&pool, &new_booking(second_asset, f.renter, Some(skipper), 3, 8))
        .await
        .unwrap();

    assert_matches!(outcome, CreateBookingOutcome::SkipperUnavailable(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn exclusion_constraint_rejects_unchecked_overlap(pool: PgPool) {
    let f = fixture(&pool).await;
    BookingRepo::create_checked(&pool, &new_booking(f.asset, f.renter, None, 1, 5))
        .await
        .unwrap();

    let err = sqlx::query(
        "INSERT INTO bookings (asset_id, renter_id, start_at, end_at, days, asset_price, total_price) \
         VALUES ($1, $2, $3, $4, 1, 100, 100)",
    )
    .bind(f.asset)
    .bind(f.renter)
    .bind(june(5))
    .bind(june(6))
    .execute(&pool)
    .await
    .unwrap_err();

    assert!(harbor_db::is_booking_overlap(&err), "unexpected error: {err}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancelled_booking_frees_the_calendar(pool: PgPool) {
    let f = fixture(&pool).await;
    let first = BookingRepo::create_checked(&pool, &new_booking(f.asset, f.renter, None, 1, 5))
        .await
        .unwrap();
    let first = assert_matches!(first, CreateBookingOutcome::Created(b) => b);

    BookingRepo::transition(&pool, first.id, BookingStatus::Requested, BookingStatus::Cancelled, None)
        .await
        .unwrap()
        .expect("transition should apply");

    let range = DateRange::new(june(2), june(4)).unwrap();
    let spans = BookingRepo::find_active_overlapping(&pool, CalendarKey::Asset(f.asset), &range)
        .await
        .unwrap();
    assert!(spans.is_empty());

    let outcome = BookingRepo::create_checked(&pool, &new_booking(f.asset, f.renter, None, 2, 4))
        .await
        .unwrap();
    assert_matches!(outcome, CreateBookingOutcome::Created(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn transition_is_guarded_on_current_status(pool: PgPool) {
    let f = fixture(&pool).await;
    let booking = BookingRepo::create_checked(&pool, &new_booking(f.asset, f.renter, None, 1, 5))
        .await
        .unwrap();
    let booking = assert_matches!(booking, CreateBookingOutcome::Created(b) => b);

    let confirmed = BookingRepo::transition(
        &pool,
        booking.id,
        BookingStatus::Requested,
        BookingStatus::Confirmed,
        Some("See you at the marina"),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(confirmed.status(), BookingStatus::Confirmed);
    assert_eq!(confirmed.owner_notes.as_deref(), Some("See you at the marina"));

    let stale = BookingRepo::transition(&pool, booking.id, BookingStatus::Requested, BookingStatus::Cancelled, None)
        .await
        .unwrap();
    assert!(stale.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_overlapping_inserts_admit_exactly_one(pool: PgPool) {
    let f = fixture(&pool).await;

    let a = new_booking(f.asset, f.renter, None, 1, 5);
    let b = new_booking(f.asset, f.renter, None, 3, 8);
    let (pool_a, pool_b) = (pool.clone(), pool.clone());
    let (ra, rb) = tokio::join!(
        tokio::spawn(async move { BookingRepo::create_checked(&pool_a, &a).await }),
        tokio::spawn(async move { BookingRepo::create_checked(&pool_b, &b).await }),
    );

    let mut created = 0;
    for result in [ra.unwrap(), rb.unwrap()] {
        match result {
            Ok(CreateBookingOutcome::Created(_)) => created += 1,
            Ok(CreateBookingOutcome::AssetUnavailable(_)) => {}
            Ok(other) => panic!("unexpected outcome: {other:?}"),
            Err(err) => assert!(harbor_db::is_booking_overlap(&err), "unexpected error: {err}"),
        }
    }
    assert_eq!(created, 1);

    let (active,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE asset_id = $1")
        .bind(f.asset)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(active, 1);
}
