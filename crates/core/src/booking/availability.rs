//! Availability check against existing reservations.
//!
//! The same predicate serves an asset's calendar and a skipper's calendar;
//! only the key used to fetch `existing` differs.

use serde::Serialize;

use super::range::spans_overlap;
use super::{BookingStatus, DateRange};
use crate::types::{DbId, Timestamp};

/// An existing reservation occupying part of a calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservedSpan {
    pub booking_id: DbId,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub status: BookingStatus,
}

impl ReservedSpan {
    /// Whether this reservation blocks `range`: it must still be active and
    /// overlap under the inclusive test.
    pub fn blocks(&self, range: &DateRange) -> bool {
        self.status.is_active() && spans_overlap(self.start_at, self.end_at, range.start(), range.end())
    }
}

/// Result of an availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityReport {
    pub available: bool,
    pub conflicts: Vec<ReservedSpan>,
}

/// Check `range` against `existing` reservations.
///
/// Cancelled and completed reservations never conflict. The report is a
/// snapshot; callers that insert afterwards rely on the storage-level
/// exclusion constraint to catch concurrent writers.
pub fn check_availability<I>(range: &DateRange, existing: I) -> AvailabilityReport
where
    I: IntoIterator<Item = ReservedSpan>,
{
    let conflicts: Vec<ReservedSpan> = existing
        .into_iter()
        .filter(|span| span.blocks(range))
        .collect();

    AvailabilityReport {
        available: conflicts.is_empty(),
        conflicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(m: u32, d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, m, d, 0, 0, 0).unwrap()
    }

    fn span(id: DbId, start: Timestamp, end: Timestamp, status: BookingStatus) -> ReservedSpan {
        ReservedSpan {
            booking_id: id,
            start_at: start,
            end_at: end,
            status,
        }
    }

    fn june_1_to_5_confirmed() -> ReservedSpan {
        span(1, at(6, 1), at(6, 5), BookingStatus::Confirmed)
    }

    #[test]
    fn boundary_day_conflicts() {
        let candidate = DateRange::new(at(6, 5), at(6, 10)).unwrap();
        let report = check_availability(&candidate, [june_1_to_5_confirmed()]);
        assert!(!report.available);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].booking_id, 1);
    }

    #[test]
    fn next_day_is_free() {
        let candidate = DateRange::new(at(6, 6), at(6, 10)).unwrap();
        let report = check_availability(&candidate, [june_1_to_5_confirmed()]);
        assert!(report.available);
        assert!(report.conflicts.is_empty());
    }

    #[test]
    fn requested_bookings_block() {
        let candidate = DateRange::new(at(6, 2), at(6, 3)).unwrap();
        let existing = span(7, at(6, 1), at(6, 5), BookingStatus::Requested);
        assert!(!check_availability(&candidate, [existing]).available);
    }

    #[test]
    fn cancelled_and_completed_bookings_do_not_block() {
        let candidate = DateRange::new(at(6, 2), at(6, 3)).unwrap();
        let existing = [
            span(1, at(6, 1), at(6, 5), BookingStatus::Cancelled),
            span(2, at(6, 1), at(6, 5), BookingStatus::Completed),
        ];
        assert!(check_availability(&candidate, existing).available);
    }

    #[test]
    fn reports_every_conflict() {
        let candidate = DateRange::new(at(6, 1), at(6, 30)).unwrap();
        let existing = [
            span(1, at(6, 1), at(6, 3), BookingStatus::Confirmed),
            span(2, at(6, 10), at(6, 12), BookingStatus::Requested),
            span(3, at(7, 10), at(7, 12), BookingStatus::Confirmed),
        ];
        let report = check_availability(&candidate, existing);
        let ids: Vec<DbId> = report.conflicts.iter().map(|c| c.booking_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn empty_calendar_is_available() {
        let candidate = DateRange::new(at(6, 1), at(6, 2)).unwrap();
        assert!(check_availability(&candidate, Vec::new()).available);
    }
}
