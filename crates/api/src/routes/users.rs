use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Account routes mounted at `/users`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::me))
        .route("/me/license", put(users::update_license))
        .route("/me/password", put(users::change_password))
        .route("/me/assets", get(users::my_assets))
        .route("/me/reviews", get(users::my_reviews))
}
