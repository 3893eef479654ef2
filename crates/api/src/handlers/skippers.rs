//! Handlers for skipper profiles and skipper availability.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use harbor_core::booking::DateRange;
use harbor_core::error::CoreError;
use harbor_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use harbor_core::review::ReviewTarget;
use harbor_core::roles::ROLE_SKIPPER;
use harbor_core::types::DbId;
use harbor_db::models::user::{SkipperProfile, UpdateSkipperProfile, UserResponse};
use harbor_db::repositories::{BookingRepo, ReviewRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::query::WindowParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// PUT /api/v1/skippers/me
///
/// Set the caller's skipper rate and profile. Skipper role only.
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<UpdateSkipperProfile>,
) -> AppResult<impl IntoResponse> {
    if auth.role != ROLE_SKIPPER {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only skippers have a skipper profile".into(),
        )));
    }

    let user = UserRepo::update_skipper_profile(
        &state.pool,
        auth.user_id,
        input.daily_rate,
        input.bio.as_deref(),
        input.experience_years,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "User",
        id: auth.user_id,
    }))?;

    tracing::info!(user_id = auth.user_id, daily_rate = input.daily_rate, "Skipper profile updated");

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// GET /api/v1/skippers?start=&end=
///
/// Reviews shown on a skipper's public page.
const PROFILE_REVIEW_LIMIT: i64 = 10;

/// Skippers with a rate set and a free calendar over the window.
pub async fn list_available(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> AppResult<impl IntoResponse> {
    let range = DateRange::new(params.start, params.end)?;
    let skippers = UserRepo::list_available_skippers(
        &state.pool,
        range.start(),
        range.end(),
        clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;

    Ok(Json(DataResponse { data: skippers }))
}

/// GET /api/v1/skippers/{id}
///
/// Public profile with completed trip count and the latest reviews.
pub async fn get_skipper(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let skipper = UserRepo::find_skipper(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Skipper", id }))?;
    let completed_trips = BookingRepo::count_completed_for_skipper(&state.pool, id).await?;
    let reviews =
        ReviewRepo::list_by_target(&state.pool, ReviewTarget::Skipper, id, PROFILE_REVIEW_LIMIT, 0)
            .await?;

    Ok(Json(DataResponse {
        data: SkipperProfile {
            skipper,
            completed_trips,
            reviews,
        },
    }))
}
