//! Booking model, DTOs and repository inputs/outputs.

use harbor_core::booking::{BookingStatus, DateRange, ExtraSelection, ReservedSpan};
use harbor_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `bookings` table, joined with the asset's `owner_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub asset_id: DbId,
    pub owner_id: DbId,
    pub renter_id: DbId,
    pub skipper_id: Option<DbId>,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub status_id: i16,
    pub with_skipper: bool,
    pub days: i32,
    pub asset_price: Money,
    pub skipper_price: Money,
    pub extras_price: Money,
    pub total_price: Money,
    pub renter_license_level: Option<i16>,
    pub renter_notes: Option<String>,
    pub owner_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    /// Decoded status. The FK to `booking_statuses` keeps this total in
    /// practice; an unknown id reads as cancelled so it never blocks.
    pub fn status(&self) -> BookingStatus {
        BookingStatus::from_id(self.status_id).unwrap_or(BookingStatus::Cancelled)
    }

    /// Whether `user_id` is the renter, the asset owner or the skipper.
    pub fn is_party(&self, user_id: DbId) -> bool {
        self.renter_id == user_id || self.owner_id == user_id || self.skipper_id == Some(user_id)
    }
}

/// Minimal projection of a booking occupying a calendar.
#[derive(Debug, Clone, FromRow)]
pub struct BookingSpan {
    pub id: DbId,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub status_id: i16,
}

impl From<BookingSpan> for ReservedSpan {
    fn from(span: BookingSpan) -> Self {
        Self {
            booking_id: span.id,
            start_at: span.start_at,
            end_at: span.end_at,
            status: BookingStatus::from_id(span.status_id).unwrap_or(BookingStatus::Cancelled),
        }
    }
}

/// A row from the `booking_extras` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingExtra {
    pub id: DbId,
    pub booking_id: DbId,
    pub extra_id: DbId,
    pub quantity: i32,
    pub price_at_booking: Money,
    pub total: Money,
    pub created_at: Timestamp,
}

/// Booking detail including its extras.
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: Booking,
    pub status: BookingStatus,
    pub extras: Vec<BookingExtra>,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Request body for `POST /bookings/quote`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuoteRequest {
    pub asset_id: DbId,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    #[serde(default)]
    pub with_skipper: bool,
    #[serde(default)]
    #[validate(length(max = 50), nested)]
    pub extras: Vec<ExtraSelection>,
}

/// Request body for `POST /bookings`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub asset_id: DbId,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    #[serde(default)]
    pub with_skipper: bool,
    pub skipper_id: Option<DbId>,
    #[serde(default)]
    #[validate(length(max = 50), nested)]
    pub extras: Vec<ExtraSelection>,
    #[validate(length(max = 2000))]
    pub renter_notes: Option<String>,
}

/// Request body for `POST /bookings/{id}/confirm`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ConfirmBooking {
    #[validate(length(max = 2000))]
    pub owner_notes: Option<String>,
}

/// Which side of a booking the listing is for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingPerspective {
    #[default]
    Renter,
    Owner,
    Skipper,
}

/// Query parameters for `GET /bookings`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingListQuery {
    #[serde(rename = "as", default)]
    pub perspective: BookingPerspective,
    pub status_id: Option<i16>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Repository inputs / outputs
// ---------------------------------------------------------------------------

/// A priced extra to persist with a new booking.
#[derive(Debug, Clone)]
pub struct NewBookingExtra {
    pub extra_id: DbId,
    pub quantity: i32,
    pub price_at_booking: Money,
    pub total: Money,
}

/// A fully priced booking ready for insertion.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub asset_id: DbId,
    pub renter_id: DbId,
    pub skipper_id: Option<DbId>,
    pub range: DateRange,
    pub with_skipper: bool,
    pub days: i32,
    pub asset_price: Money,
    pub skipper_price: Money,
    pub extras_price: Money,
    pub total_price: Money,
    pub renter_license_level: Option<i16>,
    pub renter_notes: Option<String>,
    pub extras: Vec<NewBookingExtra>,
}

/// The calendar a reservation occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarKey {
    Asset(DbId),
    Skipper(DbId),
}

/// Result of a checked insert.
#[derive(Debug)]
pub enum CreateBookingOutcome {
    Created(Booking),
    AssetUnavailable(Vec<ReservedSpan>),
    SkipperUnavailable(Vec<ReservedSpan>),
}
