//! Availability reconciliation -- the list of calendar days a client can pick.
//!
//! Merges the days produced by the expander with the days existing bookings
//! sit on. Bookings can land outside the generated series (rescheduled or
//! manually created bookings), and those days must still be offered so the
//! booking can be found and managed. Everything is day-granular: several
//! occurrences or bookings on one day collapse into a single entry.
//!
//! Capacity and double-booking limits are not enforced here.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::booking::Booking;
use crate::error::DataIntegrityWarning;
use crate::expander::TimeInterval;

/// Reconciled, bookable days for one event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDates {
    /// Strictly ascending, duplicate-free.
    pub dates: Vec<NaiveDate>,
    /// Days present only because a booking sits on them (ascending).
    pub off_schedule: Vec<NaiveDate>,
    /// Bookings skipped because their date could not be read.
    pub warnings: Vec<DataIntegrityWarning>,
}

impl AvailableDates {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.dates.binary_search(&day).is_ok()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Union the occurrence days with the booked days.
///
/// A booking whose date cannot be parsed is left out and reported in
/// [`AvailableDates::warnings`]; the remaining bookings are still reconciled.
pub fn reconcile(occurrences: &[TimeInterval], bookings: &[Booking]) -> AvailableDates {
    let scheduled: BTreeSet<NaiveDate> = occurrences.iter().map(TimeInterval::start_day).collect();

    let mut booked = BTreeSet::new();
    let mut warnings = Vec::new();
    for booking in bookings {
        match booking.day() {
            Ok(day) => {
                booked.insert(day);
            }
            Err(err) => {
                warn!(
                    booking_id = %booking.id,
                    value = %booking.date,
                    "skipping booking with unreadable date"
                );
                warnings.push(DataIntegrityWarning {
                    booking_id: booking.id.clone(),
                    value: booking.date.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    AvailableDates {
        dates: scheduled.union(&booked).copied().collect(),
        off_schedule: booked.difference(&scheduled).copied().collect(),
        warnings,
    }
}
