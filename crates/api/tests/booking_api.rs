//! HTTP-level tests for quoting, availability, booking creation and the
//! booking lifecycle.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get, get_auth, post_json, post_json_auth, put_json_auth, sailboat, TestUser,
};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn day(d: u32) -> String {
    format!("2030-06-{d:02}T00:00:00Z")
}

fn booking_body(asset_id: i64, start: u32, end: u32) -> Value {
    json!({ "asset_id": asset_id, "start_at": day(start), "end_at": day(end) })
}

async fn licensed_renter(pool: &PgPool, app: axum::Router, email: &str, level: &str) -> TestUser {
    let renter = common::create_user(pool, email, "renter").await;
    let response = put_json_auth(
        app,
        "/api/v1/users/me/license",
        json!({ "level": level, "expires_on": "2099-01-01" }),
        &renter.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    renter
}

struct World {
    app: axum::Router,
    owner: TestUser,
    renter: TestUser,
    asset_id: i64,
}

async fn world(pool: PgPool) -> World {
    let owner = common::create_user(&pool, "owner@example.com", "owner").await;
    let app = common::build_test_app(pool.clone());
    let renter = licensed_renter(&pool, app.clone(), "renter@example.com", "coastal").await;
    let asset_id = common::create_asset(app.clone(), &owner, sailboat()).await;
    World {
        app,
        owner,
        renter,
        asset_id,
    }
}

async fn book(w: &World, start: u32, end: u32) -> i64 {
    let response = post_json_auth(
        w.app.clone(),
        "/api/v1/bookings",
        booking_body(w.asset_id, start, end),
        &w.renter.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn ten_day_quote_uses_weekly_tier(pool: PgPool) {
    let w = world(pool).await;

    let response = post_json(w.app, "/api/v1/bookings/quote", booking_body(w.asset_id, 1, 11)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["days"], 10);
    assert_eq!(json["data"]["asset_price"], 90000);
    assert_eq!(json["data"]["total_price"], 90000);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn quote_prices_skipper_and_extras(pool: PgPool) {
    let w = world(pool).await;

    let extra = post_json_auth(
        w.app.clone(),
        &format!("/api/v1/assets/{}/extras", w.asset_id),
        json!({ "name": "Paddle board", "price": 2000, "pricing_mode": "per_day" }),
        &w.owner.token,
    )
    .await;
    assert_eq!(extra.status(), StatusCode::CREATED);
    let extra_id = body_json(extra).await["data"]["id"].as_i64().unwrap();

    let mut body = booking_body(w.asset_id, 1, 4);
    body["with_skipper"] = json!(true);
    body["extras"] = json!([{ "extra_id": extra_id, "quantity": 2 }]);

    let json = body_json(post_json(w.app, "/api/v1/bookings/quote", body).await).await;
    assert_eq!(json["data"]["asset_price"], 30000);
    assert_eq!(json["data"]["skipper_price"], 45000);
    assert_eq!(json["data"]["extras_price"], 12000);
    assert_eq!(json["data"]["total_price"], 87000);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oversized_quote_inputs_are_rejected(pool: PgPool) {
    let w = world(pool).await;

    let extra = post_json_auth(
        w.app.clone(),
        &format!("/api/v1/assets/{}/extras", w.asset_id),
        json!({ "name": "Mooring", "price": 5000, "pricing_mode": "per_day" }),
        &w.owner.token,
    )
    .await;
    let extra_id = body_json(extra).await["data"]["id"].as_i64().unwrap();

    let mut body = booking_body(w.asset_id, 1, 3);
    body["extras"] = json!([{ "extra_id": extra_id, "quantity": i32::MAX }]);
    let response = post_json(w.app.clone(), "/api/v1/bookings/quote", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let long = json!({
        "asset_id": w.asset_id,
        "start_at": "2024-06-01T00:00:00Z",
        "end_at": "9999-06-01T00:00:00Z",
    });
    let response = post_json(w.app, "/api/v1/bookings/quote", long).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "RANGE_TOO_LONG");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reversed_range_is_invalid(pool: PgPool) {
    let w = world(pool).await;

    let response = post_json(w.app, "/api/v1/bookings/quote", booking_body(w.asset_id, 5, 5)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_DATE_RANGE");
}

// ---------------------------------------------------------------------------
// Availability & conflicts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn shared_boundary_conflicts_but_next_day_is_free(pool: PgPool) {
    let w = world(pool).await;
    book(&w, 1, 5).await;

    let uri = |s: u32, e: u32| format!("/api/v1/assets/{}/availability?start={}&end={}", w.asset_id, day(s), day(e));

    let taken = body_json(get(w.app.clone(), &uri(5, 10)).await).await;
    assert_eq!(taken["data"]["available"], false);
    assert_eq!(taken["data"]["conflicts"].as_array().unwrap().len(), 1);

    let free = body_json(get(w.app.clone(), &uri(6, 10)).await).await;
    assert_eq!(free["data"]["available"], true);

    let response = post_json_auth(
        w.app.clone(),
        "/api/v1/bookings",
        booking_body(w.asset_id, 5, 10),
        &w.renter.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "BOOKING_CONFLICT");

    let quote = post_json(w.app, "/api/v1/bookings/quote", booking_body(w.asset_id, 3, 8)).await;
    assert_eq!(quote.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_overlapping_requests_admit_exactly_one(pool: PgPool) {
    let w = world(pool).await;

    let a = post_json_auth(w.app.clone(), "/api/v1/bookings", booking_body(w.asset_id, 1, 5), &w.renter.token);
    let b = post_json_auth(w.app.clone(), "/api/v1/bookings", booking_body(w.asset_id, 4, 9), &w.renter.token);
    let (ra, rb) = tokio::join!(a, b);

    let mut statuses = [ra.status().as_u16(), rb.status().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [201, 409]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_excludes_booked_assets(pool: PgPool) {
    let w = world(pool).await;
    book(&w, 1, 5).await;

    let busy = body_json(
        get(w.app.clone(), &format!("/api/v1/assets?start={}&end={}", day(2), day(3))).await,
    )
    .await;
    assert!(busy["data"].as_array().unwrap().is_empty());

    let free = body_json(
        get(w.app, &format!("/api/v1/assets?kind=sailboat&min_capacity=4&start={}&end={}", day(10), day(12))).await,
    )
    .await;
    assert_eq!(free["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Eligibility & skipper policy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unlicensed_renter_needs_a_skipper(pool: PgPool) {
    let w = world(pool.clone()).await;
    let newbie = common::create_user(&pool, "newbie@example.com", "renter").await;

    let response = post_json_auth(w.app.clone(), "/api/v1/bookings", booking_body(w.asset_id, 1, 3), &newbie.token).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "CREDENTIAL_MISSING");

    let mut with_skipper = booking_body(w.asset_id, 1, 3);
    with_skipper["with_skipper"] = json!(true);
    let response = post_json_auth(w.app, "/api/v1/bookings", with_skipper, &newbie.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn basic_license_is_insufficient_for_coastal_asset(pool: PgPool) {
    let w = world(pool.clone()).await;
    let basic = licensed_renter(&pool, w.app.clone(), "basic@example.com", "basic").await;

    let response = post_json_auth(w.app, "/api/v1/bookings", booking_body(w.asset_id, 1, 3), &basic.token).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "CREDENTIAL_INSUFFICIENT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn skipper_required_asset_rejects_bareboat(pool: PgPool) {
    let w = world(pool).await;
    let mut body = sailboat();
    body["skipper_required"] = json!(true);
    let crewed = common::create_asset(w.app.clone(), &w.owner, body).await;

    let response = post_json_auth(w.app, "/api/v1/bookings", booking_body(crewed, 1, 3), &w.renter.token).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "SECONDARY_OPERATOR_REQUIRED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_cannot_book_own_asset(pool: PgPool) {
    let w = world(pool).await;

    let response = post_json_auth(w.app, "/api/v1/bookings", booking_body(w.asset_id, 1, 3), &w.owner.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn named_skipper_is_charged_the_quoted_price(pool: PgPool) {
    let w = world(pool.clone()).await;
    let skipper = common::create_user(&pool, "skip@example.com", "skipper").await;
    let profile = put_json_auth(
        w.app.clone(),
        "/api/v1/skippers/me",
        json!({ "daily_rate": 20000 }),
        &skipper.token,
    )
    .await;
    assert_eq!(profile.status(), StatusCode::OK);

    let mut body = booking_body(w.asset_id, 1, 3);
    body["with_skipper"] = json!(true);
    let quote = body_json(post_json(w.app.clone(), "/api/v1/bookings/quote", body.clone()).await).await;

    body["skipper_id"] = json!(skipper.id);
    let response = post_json_auth(w.app.clone(), "/api/v1/bookings", body, &w.renter.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    // The asset's skipper rate applies, not the skipper's own profile rate.
    assert_eq!(json["data"]["skipper_price"], 30000);
    assert_eq!(json["data"]["skipper_price"], quote["data"]["skipper_price"]);
    assert_eq!(json["data"]["total_price"], quote["data"]["total_price"]);
    assert_eq!(json["data"]["skipper_id"], skipper.id);

    let second_asset = common::create_asset(w.app.clone(), &w.owner, sailboat()).await;
    let mut clash = booking_body(second_asset, 2, 4);
    clash["with_skipper"] = json!(true);
    clash["skipper_id"] = json!(skipper.id);
    let response = post_json_auth(w.app, "/api/v1/bookings", clash, &w.renter.token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "BOOKING_CONFLICT");
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_confirms_and_renter_cancels(pool: PgPool) {
    let w = world(pool).await;
    let id = book(&w, 1, 5).await;

    let denied = post_json_auth(w.app.clone(), &format!("/api/v1/bookings/{id}/confirm"), json!({}), &w.renter.token).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let confirmed = post_json_auth(
        w.app.clone(),
        &format!("/api/v1/bookings/{id}/confirm"),
        json!({ "owner_notes": "Check-in at 10:00" }),
        &w.owner.token,
    )
    .await;
    assert_eq!(confirmed.status(), StatusCode::OK);
    assert_eq!(body_json(confirmed).await["data"]["status_id"], 2);

    let again = post_json_auth(w.app.clone(), &format!("/api/v1/bookings/{id}/confirm"), json!({}), &w.owner.token).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(again).await["code"], "INVALID_STATE_TRANSITION");

    let cancelled = common::post_auth(w.app.clone(), &format!("/api/v1/bookings/{id}/cancel"), &w.renter.token).await;
    assert_eq!(cancelled.status(), StatusCode::OK);

    // A cancelled booking no longer blocks the calendar.
    book(&w, 1, 5).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn booking_detail_is_private_to_parties(pool: PgPool) {
    let w = world(pool.clone()).await;
    let id = book(&w, 1, 5).await;
    let stranger = common::create_user(&pool, "stranger@example.com", "renter").await;

    let own = get_auth(w.app.clone(), &format!("/api/v1/bookings/{id}"), &w.renter.token).await;
    assert_eq!(own.status(), StatusCode::OK);
    assert_eq!(body_json(own).await["data"]["status"], "requested");

    let other = get_auth(w.app.clone(), &format!("/api/v1/bookings/{id}"), &stranger.token).await;
    assert_eq!(other.status(), StatusCode::FORBIDDEN);

    let listed = body_json(get_auth(w.app, "/api/v1/bookings?as=owner", &w.owner.token).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn asset_with_active_booking_cannot_be_deleted(pool: PgPool) {
    let w = world(pool).await;
    book(&w, 1, 5).await;

    let response = common::delete_auth(w.app, &format!("/api/v1/assets/{}", w.asset_id), &w.owner.token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
