//! HTTP handlers, one module per resource.

pub mod assets;
pub mod auth;
pub mod bookings;
pub mod extras;
pub mod payments;
pub mod reviews;
pub mod skippers;
pub mod users;
