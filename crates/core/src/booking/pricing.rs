//! Quote calculation: daily/weekly tiers, skipper fee, and extras.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{BookingError, DateRange};
use crate::types::{DbId, Money};

/// Days in one weekly pricing tier.
pub const DAYS_PER_WEEK: i64 = 7;

/// Longest rental that can be quoted.
pub const MAX_BOOKING_DAYS: i64 = 365;

/// Largest quantity of a single extra on one booking.
pub const MAX_EXTRA_QUANTITY: i32 = 100;

/// How an extra's catalog price is applied to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// Charged once per billable day.
    PerDay,
    /// Charged once for the whole booking.
    PerBooking,
    /// Hourly items are sold as a flat block; the price is not scaled.
    PerHour,
}

impl PricingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PerDay => "per_day",
            Self::PerBooking => "per_booking",
            Self::PerHour => "per_hour",
        }
    }
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per_day" => Ok(Self::PerDay),
            "per_booking" => Ok(Self::PerBooking),
            "per_hour" => Ok(Self::PerHour),
            other => Err(format!("Unknown pricing mode '{other}'")),
        }
    }
}

/// Price-relevant fields of an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRates {
    pub daily_price: Money,
    pub weekly_price: Option<Money>,
    pub skipper_available: bool,
    pub skipper_daily_rate: Option<Money>,
}

/// One entry of an asset's active extras catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogExtra {
    pub id: DbId,
    pub name: String,
    pub price: Money,
    pub pricing_mode: PricingMode,
}

/// An extra the renter asked for.
///
/// Only the upper bound is a request-level rule; quantities below one are
/// reported by [`compute_quote`] as [`BookingError::InvalidQuantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ExtraSelection {
    pub extra_id: DbId,
    #[validate(range(max = 100, message = "Quantity may not exceed 100"))]
    pub quantity: i32,
}

/// A day-rated line of the quote (asset or skipper).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLine {
    pub daily_rate: Money,
    pub weekly_rate: Option<Money>,
    /// Full weeks billed at the weekly rate (0 when the tier does not apply).
    pub weeks: i64,
    pub days: i64,
    pub subtotal: Money,
}

/// A priced extra of the quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraLine {
    pub extra_id: DbId,
    pub name: String,
    pub unit_price: Money,
    pub pricing_mode: PricingMode,
    pub quantity: i32,
    pub total: Money,
}

/// Itemised price for a prospective booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteBreakdown {
    pub days: i64,
    pub asset_price: Money,
    pub skipper_price: Money,
    pub extras_price: Money,
    pub total_price: Money,
    pub asset: RateLine,
    pub skipper: Option<RateLine>,
    pub extras: Vec<ExtraLine>,
}

/// Base asset price for `days` days.
///
/// From seven days on, when a weekly rate exists, full weeks are billed at
/// the weekly rate and the remainder at the daily rate.
pub fn base_price(
    days: i64,
    daily_price: Money,
    weekly_price: Option<Money>,
) -> Result<Money, BookingError> {
    asset_line(days, daily_price, weekly_price).map(|line| line.subtotal)
}

fn asset_line(
    days: i64,
    daily_price: Money,
    weekly_price: Option<Money>,
) -> Result<RateLine, BookingError> {
    match weekly_price {
        Some(weekly) if days >= DAYS_PER_WEEK => {
            let weeks = days / DAYS_PER_WEEK;
            let remainder = days % DAYS_PER_WEEK;
            let subtotal = weeks
                .checked_mul(weekly)
                .zip(remainder.checked_mul(daily_price))
                .and_then(|(w, d)| w.checked_add(d))
                .ok_or(BookingError::PriceOverflow)?;
            Ok(RateLine {
                daily_rate: daily_price,
                weekly_rate: Some(weekly),
                weeks,
                days,
                subtotal,
            })
        }
        _ => Ok(RateLine {
            daily_rate: daily_price,
            weekly_rate: weekly_price,
            weeks: 0,
            days,
            subtotal: days
                .checked_mul(daily_price)
                .ok_or(BookingError::PriceOverflow)?,
        }),
    }
}

/// Compute the quote for `range` against an asset's rates and extras catalog.
///
/// Fails with [`BookingError::SecondaryOperatorUnavailable`] when a skipper
/// is requested for an asset without skipper service, with
/// [`BookingError::NotFound`] when a selected extra is not in `catalog`, and
/// with [`BookingError::RangeTooLong`] past [`MAX_BOOKING_DAYS`]. Every sum
/// is checked; amounts that do not fit in [`Money`] fail with
/// [`BookingError::PriceOverflow`].
pub fn compute_quote(
    rates: &AssetRates,
    catalog: &[CatalogExtra],
    range: &DateRange,
    with_skipper: bool,
    selections: &[ExtraSelection],
) -> Result<QuoteBreakdown, BookingError> {
    let days = range.billable_days();
    if days > MAX_BOOKING_DAYS {
        return Err(BookingError::RangeTooLong {
            max_days: MAX_BOOKING_DAYS,
        });
    }
    let asset = asset_line(days, rates.daily_price, rates.weekly_price)?;

    let skipper = if with_skipper {
        if !rates.skipper_available {
            return Err(BookingError::SecondaryOperatorUnavailable);
        }
        let daily_rate = rates.skipper_daily_rate.unwrap_or(0);
        Some(RateLine {
            daily_rate,
            weekly_rate: None,
            weeks: 0,
            days,
            subtotal: days
                .checked_mul(daily_rate)
                .ok_or(BookingError::PriceOverflow)?,
        })
    } else {
        None
    };

    let extras = selections
        .iter()
        .map(|selection| price_extra(catalog, selection, days))
        .collect::<Result<Vec<_>, _>>()?;

    let asset_price = asset.subtotal;
    let skipper_price = skipper.as_ref().map_or(0, |line| line.subtotal);
    let extras_price = extras
        .iter()
        .try_fold(0, |acc: Money, line| acc.checked_add(line.total))
        .ok_or(BookingError::PriceOverflow)?;
    let total_price = asset_price
        .checked_add(skipper_price)
        .and_then(|sum| sum.checked_add(extras_price))
        .ok_or(BookingError::PriceOverflow)?;

    Ok(QuoteBreakdown {
        days,
        asset_price,
        skipper_price,
        extras_price,
        total_price,
        asset,
        skipper,
        extras,
    })
}

fn price_extra(
    catalog: &[CatalogExtra],
    selection: &ExtraSelection,
    days: i64,
) -> Result<ExtraLine, BookingError> {
    if !(1..=MAX_EXTRA_QUANTITY).contains(&selection.quantity) {
        return Err(BookingError::InvalidQuantity {
            extra_id: selection.extra_id,
        });
    }
    let extra = catalog
        .iter()
        .find(|e| e.id == selection.extra_id)
        .ok_or(BookingError::NotFound {
            entity: "Extra",
            id: selection.extra_id,
        })?;

    let multiplier = match extra.pricing_mode {
        PricingMode::PerDay => i64::from(selection.quantity).checked_mul(days),
        PricingMode::PerBooking | PricingMode::PerHour => Some(i64::from(selection.quantity)),
    };
    let total = multiplier
        .and_then(|m| extra.price.checked_mul(m))
        .ok_or(BookingError::PriceOverflow)?;

    Ok(ExtraLine {
        extra_id: extra.id,
        name: extra.name.clone(),
        unit_price: extra.price,
        pricing_mode: extra.pricing_mode,
        quantity: selection.quantity,
        total,
    })
}
