//! Handlers for an asset's extras catalog (`/assets/{id}/extras`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use harbor_core::access::{authorize, Action, Resource};
use harbor_core::error::CoreError;
use harbor_core::types::DbId;
use harbor_db::models::extra::{CreateExtra, UpdateExtra};
use harbor_db::repositories::ExtraRepo;

use super::assets::load_asset;
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn authorize_manage(state: &AppState, auth: &AuthUser, asset_id: DbId) -> AppResult<()> {
    let asset = load_asset(&state.pool, asset_id).await?;
    authorize(
        &auth.subject(),
        Action::ManageAsset,
        &Resource::Asset {
            owner_id: asset.owner_id,
        },
    )?;
    Ok(())
}

/// GET /api/v1/assets/{id}/extras
pub async fn list_extras(
    State(state): State<AppState>,
    Path(asset_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_asset(&state.pool, asset_id).await?;
    let extras = ExtraRepo::list_active_by_asset(&state.pool, asset_id).await?;

    Ok(Json(DataResponse { data: extras }))
}

/// POST /api/v1/assets/{id}/extras
pub async fn create_extra(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(asset_id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<CreateExtra>,
) -> AppResult<impl IntoResponse> {
    authorize_manage(&state, &auth, asset_id).await?;

    let extra = ExtraRepo::create(&state.pool, asset_id, &input).await?;

    tracing::info!(asset_id, extra_id = extra.id, "Extra created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: extra })))
}

/// PUT /api/v1/assets/{id}/extras/{extra_id}
pub async fn update_extra(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((asset_id, extra_id)): Path<(DbId, DbId)>,
    ValidatedJson(input): ValidatedJson<UpdateExtra>,
) -> AppResult<impl IntoResponse> {
    authorize_manage(&state, &auth, asset_id).await?;

    let extra = ExtraRepo::update(&state.pool, asset_id, extra_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Extra",
            id: extra_id,
        }))?;

    Ok(Json(DataResponse { data: extra }))
}

/// DELETE /api/v1/assets/{id}/extras/{extra_id}
///
/// Retires the extra; bookings that already include it are unaffected.
pub async fn delete_extra(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((asset_id, extra_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    authorize_manage(&state, &auth, asset_id).await?;

    if !ExtraRepo::deactivate(&state.pool, asset_id, extra_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Extra",
            id: extra_id,
        }));
    }

    tracing::info!(asset_id, extra_id, "Extra retired");

    Ok(StatusCode::NO_CONTENT)
}
