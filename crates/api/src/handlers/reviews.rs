//! Handlers for the `/reviews` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use harbor_core::access::{authorize, Action, Resource};
use harbor_core::error::CoreError;
use harbor_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use harbor_core::review::{validate_review, ReviewedBooking};
use harbor_core::types::DbId;
use harbor_db::models::review::{CreateReview, Review, ReviewListParams, UpdateReview};
use harbor_db::repositories::ReviewRepo;
use harbor_db::DbPool;

use super::bookings::load_booking;
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn load_own_review(pool: &DbPool, auth: &AuthUser, id: DbId) -> AppResult<Review> {
    let review = ReviewRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Review", id }))?;
    authorize(
        &auth.subject(),
        Action::ModifyReview,
        &Resource::Review {
            author_id: review.author_id,
        },
    )?;
    Ok(review)
}

/// POST /api/v1/reviews
pub async fn create_review(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateReview>,
) -> AppResult<impl IntoResponse> {
    let booking = load_booking(&state.pool, input.booking_id).await?;

    validate_review(
        &ReviewedBooking {
            status: booking.status(),
            asset_id: booking.asset_id,
            renter_id: booking.renter_id,
            owner_id: booking.owner_id,
            skipper_id: booking.skipper_id,
        },
        auth.user_id,
        input.target_type,
        input.target_id,
        input.rating,
    )?;

    let review = ReviewRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        review_id = review.id,
        booking_id = review.booking_id,
        target_type = %input.target_type,
        "Review created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// GET /api/v1/reviews?target_type=&target_id=
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ReviewListParams>,
) -> AppResult<impl IntoResponse> {
    let reviews = ReviewRepo::list_by_target(
        &state.pool,
        params.target_type,
        params.target_id,
        clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;

    Ok(Json(DataResponse { data: reviews }))
}

/// PUT /api/v1/reviews/{id}
pub async fn update_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateReview>,
) -> AppResult<impl IntoResponse> {
    load_own_review(&state.pool, &auth, id).await?;

    let review = ReviewRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Review", id }))?;

    Ok(Json(DataResponse { data: review }))
}

/// DELETE /api/v1/reviews/{id}
pub async fn delete_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_own_review(&state.pool, &auth, id).await?;

    if !ReviewRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Review", id }));
    }

    tracing::info!(review_id = id, user_id = auth.user_id, "Review deleted");

    Ok(StatusCode::NO_CONTENT)
}
