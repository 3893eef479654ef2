use chrono::NaiveDate;

use super::eligibility::LicenseLevel;
use super::lifecycle::BookingStatus;
use crate::types::DbId;

/// Business-rule failures raised by the booking engine.
///
/// Every variant maps to a stable, machine-readable code via
/// [`BookingError::code`] so API clients can branch on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("End date must be after start date")]
    InvalidDateRange,

    #[error("Quantity for extra {extra_id} must be between 1 and 100")]
    InvalidQuantity { extra_id: DbId },

    #[error("Bookings may last at most {max_days} days")]
    RangeTooLong { max_days: i64 },

    #[error("Quoted amount is too large")]
    PriceOverflow,

    #[error("Skipper service is not available for this asset")]
    SecondaryOperatorUnavailable,

    #[error("This asset can only be rented with a skipper")]
    SecondaryOperatorRequired,

    #[error("A valid license is required for this rental")]
    CredentialMissing,

    #[error("License expired on {expired_on}")]
    CredentialExpired { expired_on: NaiveDate },

    #[error("This asset requires a {required} license or higher, renter holds {held}")]
    CredentialInsufficient {
        required: LicenseLevel,
        held: LicenseLevel,
    },

    #[error("Invalid booking transition: {from} -> {to}")]
    InvalidStateTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// An overlapping active booking exists (or a concurrent writer won).
    #[error("{0}")]
    Conflict(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },
}

impl BookingError {
    /// Stable error code surfaced to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::InvalidQuantity { .. } => "INVALID_QUANTITY",
            Self::RangeTooLong { .. } => "RANGE_TOO_LONG",
            Self::PriceOverflow => "PRICE_OVERFLOW",
            Self::SecondaryOperatorUnavailable => "SECONDARY_OPERATOR_UNAVAILABLE",
            Self::SecondaryOperatorRequired => "SECONDARY_OPERATOR_REQUIRED",
            Self::CredentialMissing => "CREDENTIAL_MISSING",
            Self::CredentialExpired { .. } => "CREDENTIAL_EXPIRED",
            Self::CredentialInsufficient { .. } => "CREDENTIAL_INSUFFICIENT",
            Self::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            Self::Conflict(_) => "BOOKING_CONFLICT",
            Self::NotFound { .. } => "NOT_FOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(BookingError::InvalidDateRange.code(), "INVALID_DATE_RANGE");
        assert_eq!(
            BookingError::Conflict("taken".into()).code(),
            "BOOKING_CONFLICT"
        );
        assert_eq!(
            BookingError::NotFound { entity: "Extra", id: 3 }.code(),
            "NOT_FOUND"
        );
        assert_eq!(BookingError::PriceOverflow.code(), "PRICE_OVERFLOW");
        assert_eq!(BookingError::RangeTooLong { max_days: 365 }.code(), "RANGE_TOO_LONG");
    }

    #[test]
    fn insufficient_message_names_both_levels() {
        let err = BookingError::CredentialInsufficient {
            required: LicenseLevel::Coastal,
            held: LicenseLevel::Basic,
        };
        let msg = err.to_string();
        assert!(msg.contains("coastal"));
        assert!(msg.contains("basic"));
    }
}
