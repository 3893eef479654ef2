//! Row models and DTOs, one module per table family.
//!
//! Row structs derive `FromRow` + `Serialize`; input DTOs derive
//! `Deserialize` + `Validate` so handlers can reject malformed bodies before
//! any business rule runs.

pub mod asset;
pub mod booking;
pub mod extra;
pub mod payment;
pub mod review;
pub mod user;
