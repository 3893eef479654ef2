use axum::routing::{get, put};
use axum::Router;

use crate::handlers::skippers;
use crate::state::AppState;

/// Skipper routes mounted at `/skippers`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(skippers::list_available))
        .route("/me", put(skippers::update_profile))
        .route("/{id}", get(skippers::get_skipper))
}
