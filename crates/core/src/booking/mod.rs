//! Booking quote and availability engine.
//!
//! The booking-creation use case composes the pieces in this order:
//!
//! 1. [`eligibility::validate_eligibility`] -- renter credential vs. asset requirement.
//! 2. [`availability::check_availability`] -- inclusive overlap against active bookings.
//! 3. [`pricing::compute_quote`] -- daily/weekly tiers, skipper fee, extras.
//! 4. Persist (repository layer, guarded by exclusion constraints).
//!
//! Everything here is pure; callers fetch reference data and pass it in.

pub mod availability;
pub mod eligibility;
mod error;
pub mod lifecycle;
pub mod pricing;
pub mod range;

pub use availability::{check_availability, AvailabilityReport, ReservedSpan};
pub use eligibility::{validate_eligibility, Credential, LicenseLevel};
pub use error::BookingError;
pub use lifecycle::{BookingStatus, BookingTransition, ACTIVE_STATUS_IDS};
pub use pricing::{compute_quote, AssetRates, CatalogExtra, ExtraSelection, PricingMode, QuoteBreakdown};
pub use range::DateRange;
