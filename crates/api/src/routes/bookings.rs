//! Booking routes mounted at `/bookings`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{bookings, payments};
use crate::state::AppState;

/// ```text
/// POST   /quote                -> quote
/// GET    /                     -> list_bookings
/// POST   /                     -> create_booking
/// GET    /{id}                 -> get_booking
/// POST   /{id}/confirm         -> confirm_booking
/// POST   /{id}/cancel          -> cancel_booking
/// POST   /{id}/complete        -> complete_booking
/// GET    /{id}/payment         -> payments::get_booking_payment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(bookings::quote))
        .route("/", get(bookings::list_bookings).post(bookings::create_booking))
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}/confirm", post(bookings::confirm_booking))
        .route("/{id}/cancel", post(bookings::cancel_booking))
        .route("/{id}/complete", post(bookings::complete_booking))
        .route("/{id}/payment", get(payments::get_booking_payment))
}
