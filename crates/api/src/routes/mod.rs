pub mod assets;
pub mod auth;
pub mod bookings;
pub mod health;
pub mod payments;
pub mod reviews;
pub mod skippers;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/signup                                  register (public)
/// /auth/login                                   login (public)
///
/// /users/me                                     current account
/// /users/me/license                             replace license record (PUT)
/// /users/me/password                            change password (PUT)
/// /users/me/assets                              my listings
/// /users/me/reviews                             reviews I wrote
///
/// /skippers                                     available skippers (?start=&end=)
/// /skippers/me                                  skipper profile (PUT)
/// /skippers/{id}                                public profile
///
/// /assets                                       search, create
/// /assets/{id}                                  get, update, deactivate
/// /assets/{id}/availability                     availability report
/// /assets/{id}/extras                           list, create
/// /assets/{id}/extras/{extra_id}                update, retire
///
/// /bookings/quote                               price a booking (POST)
/// /bookings                                     list mine, create
/// /bookings/{id}                                get
/// /bookings/{id}/confirm|cancel|complete        lifecycle (POST)
/// /bookings/{id}/payment                        payment of a booking
///
/// /reviews                                      list by target, create
/// /reviews/{id}                                 update, delete (author)
///
/// /payments                                     my payments, pay a booking (POST)
/// /payments/{id}                                get
/// /payments/{id}/refund                         refund a cancelled booking (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/skippers", skippers::router())
        .nest("/assets", assets::router())
        .nest("/bookings", bookings::router())
        .nest("/reviews", reviews::router())
        .nest("/payments", payments::router())
}
