use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// Payment routes mounted at `/payments`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(payments::list_my_payments).post(payments::create_payment),
        )
        .route("/{id}", get(payments::get_payment))
        .route("/{id}/refund", post(payments::refund_payment))
}
