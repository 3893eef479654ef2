//! Domain types and business rules for the Harbor rental marketplace.
//!
//! This crate has no internal dependencies and performs no I/O, so the
//! booking engine can be exercised directly from unit tests, the repository
//! layer, and the HTTP handlers alike.

pub mod access;
pub mod booking;
pub mod error;
pub mod pagination;
pub mod payment;
pub mod review;
pub mod roles;
pub mod types;
