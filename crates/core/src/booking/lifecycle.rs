//! Booking status state machine.
//!
//! ```text
//! requested --confirm--> confirmed --complete--> completed
//!     |                      |
//!     +-------cancel---------+--> cancelled
//! ```
//!
//! `cancelled` and `completed` are terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::BookingError;

/// Booking status IDs matching the `booking_statuses` seed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum BookingStatus {
    Requested = 1,
    Confirmed = 2,
    Cancelled = 3,
    Completed = 4,
}

impl BookingStatus {
    /// Return the database status ID.
    pub fn id(self) -> i16 {
        self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Self::Requested),
            2 => Some(Self::Confirmed),
            3 => Some(Self::Cancelled),
            4 => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Active bookings occupy the calendar.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Requested | Self::Confirmed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Statuses reachable from `self` in one step.
    pub fn valid_transitions(self) -> &'static [BookingStatus] {
        match self {
            Self::Requested => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::Cancelled, Self::Completed],
            Self::Cancelled | Self::Completed => &[],
        }
    }

    pub fn can_transition(self, to: BookingStatus) -> bool {
        self.valid_transitions().contains(&to)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Active status IDs, for SQL filters and the exclusion constraints.
pub const ACTIVE_STATUS_IDS: [i16; 2] = [BookingStatus::Requested as i16, BookingStatus::Confirmed as i16];

/// The actions that move a booking between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingTransition {
    Confirm,
    Cancel,
    Complete,
}

impl BookingTransition {
    pub fn target(self) -> BookingStatus {
        match self {
            Self::Confirm => BookingStatus::Confirmed,
            Self::Cancel => BookingStatus::Cancelled,
            Self::Complete => BookingStatus::Completed,
        }
    }

    /// Validate applying this transition to a booking in `from`, returning
    /// the resulting status.
    pub fn apply(self, from: BookingStatus) -> Result<BookingStatus, BookingError> {
        let to = self.target();
        if from.can_transition(to) {
            Ok(to)
        } else {
            Err(BookingError::InvalidStateTransition { from, to })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const ALL: [BookingStatus; 4] = [
        BookingStatus::Requested,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Completed,
    ];

    #[test]
    fn requested_can_be_confirmed() {
        assert_eq!(
            BookingTransition::Confirm.apply(BookingStatus::Requested),
            Ok(BookingStatus::Confirmed)
        );
    }

    #[test]
    fn requested_and_confirmed_can_be_cancelled() {
        assert!(BookingTransition::Cancel.apply(BookingStatus::Requested).is_ok());
        assert!(BookingTransition::Cancel.apply(BookingStatus::Confirmed).is_ok());
    }

    #[test]
    fn only_confirmed_can_complete() {
        assert!(BookingTransition::Complete.apply(BookingStatus::Confirmed).is_ok());
        assert_matches!(
            BookingTransition::Complete.apply(BookingStatus::Requested),
            Err(BookingError::InvalidStateTransition {
                from: BookingStatus::Requested,
                to: BookingStatus::Completed,
            })
        );
    }

    #[test]
    fn confirm_twice_is_rejected() {
        assert!(BookingTransition::Confirm.apply(BookingStatus::Confirmed).is_err());
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for from in [BookingStatus::Cancelled, BookingStatus::Completed] {
            assert!(from.is_terminal());
            for to in ALL {
                assert!(!from.can_transition(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn active_statuses_match_constant() {
        let active: Vec<i16> = ALL.iter().filter(|s| s.is_active()).map(|s| s.id()).collect();
        assert_eq!(active, ACTIVE_STATUS_IDS.to_vec());
    }

    #[test]
    fn ids_round_trip() {
        for status in ALL {
            assert_eq!(BookingStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(BookingStatus::from_id(0), None);
    }
}
