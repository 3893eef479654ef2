//! Handlers for the `/assets` resource: listing, search and availability.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use harbor_core::access::{authorize, Action, Resource};
use harbor_core::booking::{check_availability, DateRange};
use harbor_core::error::CoreError;
use harbor_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use harbor_core::types::DbId;
use harbor_db::models::asset::{Asset, AssetDetail, AssetSearchParams, CreateAsset, UpdateAsset};
use harbor_db::models::booking::CalendarKey;
use harbor_db::repositories::{AssetRepo, BookingRepo};
use harbor_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::query::WindowParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load an active asset or fail with 404.
pub(crate) async fn load_asset(pool: &DbPool, id: DbId) -> AppResult<Asset> {
    AssetRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))
}

fn check_skipper_flags(required: bool, available: bool) -> AppResult<()> {
    if required && !available {
        return Err(AppError::Core(CoreError::Validation(
            "An asset that requires a skipper must offer skipper service".into(),
        )));
    }
    Ok(())
}

/// POST /api/v1/assets
pub async fn create_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateAsset>,
) -> AppResult<impl IntoResponse> {
    authorize(&auth.subject(), Action::CreateAsset, &Resource::Platform)?;
    check_skipper_flags(input.skipper_required, input.skipper_available)?;

    let asset = AssetRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(asset_id = asset.id, owner_id = auth.user_id, "Asset created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// GET /api/v1/assets
///
/// Public search over active assets.
pub async fn list_assets(
    State(state): State<AppState>,
    Query(params): Query<AssetSearchParams>,
) -> AppResult<impl IntoResponse> {
    if let (Some(start), Some(end)) = (params.start, params.end) {
        DateRange::new(start, end)?;
    }

    let assets = AssetRepo::search(
        &state.pool,
        &params,
        clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;

    Ok(Json(DataResponse { data: assets }))
}

/// GET /api/v1/assets/{id}
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = load_asset(&state.pool, id).await?;
    let (avg_rating, review_count) = AssetRepo::rating_summary(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: AssetDetail {
            asset,
            avg_rating,
            review_count,
        },
    }))
}

/// PUT /api/v1/assets/{id}
pub async fn update_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateAsset>,
) -> AppResult<impl IntoResponse> {
    let current = load_asset(&state.pool, id).await?;
    authorize(
        &auth.subject(),
        Action::ManageAsset,
        &Resource::Asset {
            owner_id: current.owner_id,
        },
    )?;
    check_skipper_flags(
        input.skipper_required.unwrap_or(current.skipper_required),
        input.skipper_available.unwrap_or(current.skipper_available),
    )?;

    let asset = AssetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;

    tracing::info!(asset_id = id, user_id = auth.user_id, "Asset updated");

    Ok(Json(DataResponse { data: asset }))
}

/// DELETE /api/v1/assets/{id}
///
/// Deactivates the asset. Refused while requested or confirmed bookings exist.
pub async fn delete_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = load_asset(&state.pool, id).await?;
    authorize(
        &auth.subject(),
        Action::ManageAsset,
        &Resource::Asset {
            owner_id: asset.owner_id,
        },
    )?;

    if AssetRepo::has_active_bookings(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot delete an asset with active bookings".into(),
        )));
    }

    if !AssetRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Asset", id }));
    }

    tracing::info!(asset_id = id, user_id = auth.user_id, "Asset deactivated");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/assets/{id}/availability?start=&end=
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<WindowParams>,
) -> AppResult<impl IntoResponse> {
    let range = DateRange::new(params.start, params.end)?;
    load_asset(&state.pool, id).await?;

    let existing = BookingRepo::find_active_overlapping(&state.pool, CalendarKey::Asset(id), &range).await?;
    let report = check_availability(&range, existing);

    Ok(Json(DataResponse { data: report }))
}
