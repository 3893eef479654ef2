//! Handlers for the `/bookings` resource.
//!
//! Creation runs the booking engine in order: date range, skipper policy,
//! eligibility (bareboat only), quote, then the checked insert. The insert
//! re-checks calendars in its transaction and the storage-level exclusion
//! constraints turn a lost race into `BOOKING_CONFLICT`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use harbor_core::access::{authorize, Action, Resource};
use harbor_core::booking::{
    check_availability, compute_quote, validate_eligibility, BookingError, BookingTransition,
    CatalogExtra, DateRange,
};
use harbor_core::booking::pricing::MAX_BOOKING_DAYS;
use harbor_core::error::CoreError;
use harbor_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use harbor_core::roles::ROLE_SKIPPER;
use harbor_core::types::DbId;
use harbor_db::models::booking::{
    Booking, BookingDetail, BookingListQuery, CalendarKey, ConfirmBooking, CreateBookingOutcome,
    CreateBookingRequest, NewBooking, NewBookingExtra, QuoteRequest,
};
use harbor_db::repositories::{BookingRepo, ExtraRepo, UserRepo};
use harbor_db::DbPool;

use super::assets::load_asset;
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a booking or fail with 404.
pub(crate) async fn load_booking(pool: &DbPool, id: DbId) -> AppResult<Booking> {
    BookingRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Booking", id }))
}

/// The access-relevant view of a booking.
pub(crate) fn booking_resource(booking: &Booking) -> Resource {
    Resource::Booking {
        renter_id: booking.renter_id,
        owner_id: booking.owner_id,
        skipper_id: booking.skipper_id,
    }
}

async fn load_catalog(pool: &DbPool, asset_id: DbId) -> AppResult<Vec<CatalogExtra>> {
    let extras = ExtraRepo::list_active_by_asset(pool, asset_id).await?;
    Ok(extras.iter().filter_map(|extra| extra.to_catalog()).collect())
}

// ---------------------------------------------------------------------------
// Quote & create
// ---------------------------------------------------------------------------

/// POST /api/v1/bookings/quote
///
/// Price a prospective booking. Fails with `BOOKING_CONFLICT` when the
/// asset is already taken for the window.
pub async fn quote(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<QuoteRequest>,
) -> AppResult<impl IntoResponse> {
    let range = DateRange::new(input.start_at, input.end_at)?;
    let asset = load_asset(&state.pool, input.asset_id).await?;
    let catalog = load_catalog(&state.pool, asset.id).await?;

    let breakdown = compute_quote(
        &asset.rates(),
        &catalog,
        &range,
        input.with_skipper,
        &input.extras,
    )?;

    let existing =
        BookingRepo::find_active_overlapping(&state.pool, CalendarKey::Asset(asset.id), &range).await?;
    if !check_availability(&range, existing).available {
        return Err(BookingError::Conflict("Asset is not available for the selected dates".into()).into());
    }

    Ok(Json(DataResponse { data: breakdown }))
}

/// POST /api/v1/bookings
pub async fn create_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateBookingRequest>,
) -> AppResult<impl IntoResponse> {
    let range = DateRange::new(input.start_at, input.end_at)?;
    let asset = load_asset(&state.pool, input.asset_id).await?;

    if asset.owner_id == auth.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot book your own asset".into(),
        )));
    }
    if asset.skipper_required && !input.with_skipper {
        return Err(BookingError::SecondaryOperatorRequired.into());
    }
    if input.skipper_id.is_some() && !input.with_skipper {
        return Err(AppError::Core(CoreError::Validation(
            "skipper_id requires with_skipper".into(),
        )));
    }

    let renter = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::Unauthorized("Account not found".into())))?;

    // A hired skipper carries the license requirement.
    if !input.with_skipper {
        validate_eligibility(
            asset.required_license(),
            renter.credential().as_ref(),
            Utc::now().date_naive(),
        )?;
    }

    // The skipper fee always follows the asset's rate so the booking matches
    // its quote; a named skipper only has to exist and be free.
    if let Some(skipper_id) = input.skipper_id {
        UserRepo::find_by_id(&state.pool, skipper_id)
            .await?
            .filter(|u| u.role == ROLE_SKIPPER)
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Skipper",
                id: skipper_id,
            }))?;
    }

    let catalog = load_catalog(&state.pool, asset.id).await?;
    let breakdown = compute_quote(&asset.rates(), &catalog, &range, input.with_skipper, &input.extras)?;

    let new_booking = NewBooking {
        asset_id: asset.id,
        renter_id: auth.user_id,
        skipper_id: input.skipper_id,
        range,
        with_skipper: input.with_skipper,
        days: i32::try_from(breakdown.days).map_err(|_| BookingError::RangeTooLong {
            max_days: MAX_BOOKING_DAYS,
        })?,
        asset_price: breakdown.asset_price,
        skipper_price: breakdown.skipper_price,
        extras_price: breakdown.extras_price,
        total_price: breakdown.total_price,
        renter_license_level: Some(renter.license_level),
        renter_notes: input.renter_notes,
        extras: breakdown
            .extras
            .iter()
            .map(|line| NewBookingExtra {
                extra_id: line.extra_id,
                quantity: line.quantity,
                price_at_booking: line.unit_price,
                total: line.total,
            })
            .collect(),
    };

    let booking = match BookingRepo::create_checked(&state.pool, &new_booking).await? {
        CreateBookingOutcome::Created(booking) => booking,
        CreateBookingOutcome::AssetUnavailable(conflicts) => {
            tracing::debug!(asset_id = asset.id, conflicts = conflicts.len(), "Asset calendar conflict");
            return Err(BookingError::Conflict("Asset is not available for the selected dates".into()).into());
        }
        CreateBookingOutcome::SkipperUnavailable(conflicts) => {
            tracing::debug!(skipper_id = ?input.skipper_id, conflicts = conflicts.len(), "Skipper calendar conflict");
            return Err(BookingError::Conflict("Skipper is not available for the selected dates".into()).into());
        }
    };

    tracing::info!(
        booking_id = booking.id,
        asset_id = booking.asset_id,
        renter_id = booking.renter_id,
        total_price = booking.total_price,
        "Booking created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// GET /api/v1/bookings?as=renter|owner|skipper&status_id=
pub async fn list_bookings(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BookingListQuery>,
) -> AppResult<impl IntoResponse> {
    let bookings = BookingRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.perspective,
        params.status_id,
        clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;

    Ok(Json(DataResponse { data: bookings }))
}

/// GET /api/v1/bookings/{id}
pub async fn get_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = load_booking(&state.pool, id).await?;
    authorize(&auth.subject(), Action::ViewBooking, &booking_resource(&booking))?;

    let extras = BookingRepo::list_extras(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: BookingDetail {
            status: booking.status(),
            booking,
            extras,
        },
    }))
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/bookings/{id}/confirm
pub async fn confirm_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<ConfirmBooking>,
) -> AppResult<impl IntoResponse> {
    let booking = apply_transition(
        &state,
        &auth,
        id,
        BookingTransition::Confirm,
        input.owner_notes.as_deref(),
    )
    .await?;
    Ok(Json(DataResponse { data: booking }))
}

/// POST /api/v1/bookings/{id}/cancel
pub async fn cancel_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = apply_transition(&state, &auth, id, BookingTransition::Cancel, None).await?;
    Ok(Json(DataResponse { data: booking }))
}

/// POST /api/v1/bookings/{id}/complete
pub async fn complete_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = apply_transition(&state, &auth, id, BookingTransition::Complete, None).await?;
    Ok(Json(DataResponse { data: booking }))
}

async fn apply_transition(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
    transition: BookingTransition,
    owner_notes: Option<&str>,
) -> AppResult<Booking> {
    let booking = load_booking(&state.pool, id).await?;

    let action = match transition {
        BookingTransition::Confirm => Action::ConfirmBooking,
        BookingTransition::Cancel => Action::CancelBooking,
        BookingTransition::Complete => Action::CompleteBooking,
    };
    authorize(&auth.subject(), action, &booking_resource(&booking))?;

    let from = booking.status();
    let to = transition.apply(from)?;

    let updated = BookingRepo::transition(&state.pool, id, from, to, owner_notes)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Booking status changed concurrently, reload and retry".into(),
            ))
        })?;

    tracing::info!(booking_id = id, user_id = auth.user_id, %from, %to, "Booking transitioned");

    Ok(updated)
}
