use axum::routing::{get, put};
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// Review routes mounted at `/reviews`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::list_reviews).post(reviews::create_review))
        .route("/{id}", put(reviews::update_review).delete(reviews::delete_review))
}
