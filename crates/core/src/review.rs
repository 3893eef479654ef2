//! Review eligibility rules and rating aggregation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::booking::BookingStatus;
use crate::error::CoreError;
use crate::types::DbId;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// What a review is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewTarget {
    Asset,
    Skipper,
    Renter,
}

impl ReviewTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Skipper => "skipper",
            Self::Renter => "renter",
        }
    }
}

impl fmt::Display for ReviewTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset" => Ok(Self::Asset),
            "skipper" => Ok(Self::Skipper),
            "renter" => Ok(Self::Renter),
            other => Err(format!("Unknown review target '{other}'")),
        }
    }
}

/// The participants of the booking a review refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewedBooking {
    pub status: BookingStatus,
    pub asset_id: DbId,
    pub renter_id: DbId,
    pub owner_id: DbId,
    pub skipper_id: Option<DbId>,
}

/// Check that `author_id` may review `target_id` of kind `target` for `booking`.
///
/// - Only completed bookings can be reviewed.
/// - The author must have taken part in the booking and cannot review themselves.
/// - Assets are reviewed by the renter; skippers by the renter or owner;
///   renters by the owner or skipper. The target must belong to the booking.
pub fn validate_review(
    booking: &ReviewedBooking,
    author_id: DbId,
    target: ReviewTarget,
    target_id: DbId,
    rating: i16,
) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }

    if booking.status != BookingStatus::Completed {
        return Err(CoreError::Validation(
            "Reviews can only be created for completed bookings".into(),
        ));
    }

    let is_renter = booking.renter_id == author_id;
    let is_owner = booking.owner_id == author_id;
    let is_skipper = booking.skipper_id == Some(author_id);

    if !(is_renter || is_owner || is_skipper) {
        return Err(CoreError::Forbidden(
            "You can only review bookings you participated in".into(),
        ));
    }

    if target != ReviewTarget::Asset && target_id == author_id {
        return Err(CoreError::Validation("You cannot review yourself".into()));
    }

    match target {
        ReviewTarget::Asset => {
            if !is_renter {
                return Err(CoreError::Forbidden(
                    "Only the renter can review the asset".into(),
                ));
            }
            if booking.asset_id != target_id {
                return Err(CoreError::Validation(
                    "Target asset does not match the booking".into(),
                ));
            }
        }
        ReviewTarget::Skipper => {
            if !(is_renter || is_owner) {
                return Err(CoreError::Forbidden(
                    "Only the renter or asset owner can review the skipper".into(),
                ));
            }
            match booking.skipper_id {
                None => {
                    return Err(CoreError::Validation(
                        "This booking did not have a skipper".into(),
                    ))
                }
                Some(skipper_id) if skipper_id != target_id => {
                    return Err(CoreError::Validation(
                        "Target skipper does not match the booking".into(),
                    ))
                }
                Some(_) => {}
            }
        }
        ReviewTarget::Renter => {
            if !(is_owner || is_skipper) {
                return Err(CoreError::Forbidden(
                    "Only the asset owner or skipper can review the renter".into(),
                ));
            }
            if booking.renter_id != target_id {
                return Err(CoreError::Validation(
                    "Target renter does not match the booking".into(),
                ));
            }
        }
    }

    Ok(())
}

/// Mean of `ratings` rounded to one decimal place; `0.0` when empty.
pub fn average_rating(ratings: &[i16]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    let mean = sum as f64 / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}
