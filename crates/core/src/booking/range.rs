//! Candidate booking windows.

use serde::Serialize;

use super::BookingError;
use crate::types::Timestamp;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// A validated booking window with `end` strictly after `start`.
///
/// Both ends are inclusive for overlap purposes: a window ending on the
/// same instant another one starts is considered to collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: Timestamp,
    end: Timestamp,
}

impl DateRange {
    /// Build a range, rejecting `end <= start` with
    /// [`BookingError::InvalidDateRange`].
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, BookingError> {
        if end <= start {
            return Err(BookingError::InvalidDateRange);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Number of billable days: the duration divided by one day, rounded up.
    ///
    /// Always at least 1 since the range is non-empty.
    pub fn billable_days(&self) -> i64 {
        let millis = (self.end - self.start).num_milliseconds();
        (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    }

    /// Inclusive overlap test against another range.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        spans_overlap(self.start, self.end, other.start, other.end)
    }
}

/// Inclusive overlap test on raw bounds: `start1 <= end2 && end1 >= start2`.
///
/// Back-to-back windows sharing a boundary instant count as overlapping.
pub fn spans_overlap(start1: Timestamp, end1: Timestamp, start2: Timestamp, end2: Timestamp) -> bool {
    start1 <= end2 && end1 >= start2
}
