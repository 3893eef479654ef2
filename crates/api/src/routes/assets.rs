//! Asset and extras routes mounted at `/assets`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{assets, extras};
use crate::state::AppState;

/// ```text
/// GET    /                            -> list_assets
/// POST   /                            -> create_asset
/// GET    /{id}                        -> get_asset
/// PUT    /{id}                        -> update_asset
/// DELETE /{id}                        -> delete_asset
/// GET    /{id}/availability           -> get_availability
/// GET    /{id}/extras                 -> list_extras
/// POST   /{id}/extras                 -> create_extra
/// PUT    /{id}/extras/{extra_id}      -> update_extra
/// DELETE /{id}/extras/{extra_id}      -> delete_extra
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list_assets).post(assets::create_asset))
        .route(
            "/{id}",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/{id}/availability", get(assets::get_availability))
        .route("/{id}/extras", get(extras::list_extras).post(extras::create_extra))
        .route(
            "/{id}/extras/{extra_id}",
            put(extras::update_extra).delete(extras::delete_extra),
        )
}
