//! Payment states and refund rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::booking::BookingStatus;
use crate::error::CoreError;

/// Settlement currency for every payment.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Lifecycle of a payment row (`ck_payments_status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(format!("Unknown payment status '{other}'")),
        }
    }
}

/// Check that a payment may be refunded.
///
/// Only a completed payment whose booking has been cancelled qualifies.
pub fn ensure_refundable(payment: PaymentStatus, booking: BookingStatus) -> Result<(), CoreError> {
    if payment != PaymentStatus::Completed {
        return Err(CoreError::Validation(format!(
            "Only completed payments can be refunded (payment is {payment})"
        )));
    }
    if booking != BookingStatus::Cancelled {
        return Err(CoreError::Validation(format!(
            "Booking must be cancelled before refunding (booking is {})",
            booking.name()
        )));
    }
    Ok(())
}
