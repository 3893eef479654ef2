//! Handlers for the caller's own account (`/users/me`).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use harbor_core::error::CoreError;
use harbor_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use harbor_db::models::user::{ChangePassword, UpdateLicense, UserResponse};
use harbor_db::repositories::{AssetRepo, ReviewRepo, UserRepo};

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/v1/users/me/license
///
/// Replace the caller's license record. Level `none` clears the license.
pub async fn update_license(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<UpdateLicense>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::update_license(
        &state.pool,
        auth.user_id,
        input.level.ordinal(),
        input.license_number.as_deref(),
        input.expires_on,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "User",
        id: auth.user_id,
    }))?;

    tracing::info!(user_id = auth.user_id, level = %input.level, "License updated");

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/v1/users/me/password
///
/// Requires the current password. Existing tokens stay valid until expiry.
pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ChangePassword>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Validation(
            "Current password is incorrect".into(),
        )));
    }

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    tracing::info!(user_id = user.id, "Password changed");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users/me/assets
///
/// The caller's listings, including deactivated ones.
pub async fn my_assets(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let assets = AssetRepo::list_by_owner(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: assets }))
}

/// GET /api/v1/users/me/reviews
pub async fn my_reviews(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let reviews = ReviewRepo::list_by_author(
        &state.pool,
        auth.user_id,
        clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;

    Ok(Json(DataResponse { data: reviews }))
}
