//! Booking lifecycle -- which status changes a booking may undergo.
//!
//! The machine only answers questions; it never mutates a booking. Callers
//! consult it before committing a status change and reject the change if the
//! answer is no. Payment status is a separate axis and is not governed here.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, TransitionError};

/// Where a booking stands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Rescheduled,
    Completed,
    Cancelled,
    #[serde(alias = "no-show", alias = "noShow")]
    NoShow,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Rescheduled,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::NoShow,
    ];

    /// The transition table: every status a booking may move to from `self`.
    pub const fn successors(self) -> &'static [BookingStatus] {
        use BookingStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[Completed, Cancelled, Rescheduled, NoShow],
            Rescheduled => &[Confirmed, Cancelled],
            Completed | Cancelled | NoShow => &[],
        }
    }

    /// Terminal statuses have no outgoing transitions.
    pub const fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }

    /// Wire name, as used in serialized bookings.
    pub const fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Rescheduled => "rescheduled",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Rescheduled => "Rescheduled",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::NoShow => "No-show",
        };
        f.write_str(label)
    }
}

impl FromStr for BookingStatus {
    type Err = EngineError;

    /// Case-insensitive; `no_show`, `no-show`, `NoShow` and `no show` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "rescheduled" => Ok(BookingStatus::Rescheduled),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            "noshow" => Ok(BookingStatus::NoShow),
            _ => Err(EngineError::UnknownStatus(s.to_string())),
        }
    }
}

/// Every status a booking in `from` may legally move to.
pub fn next_statuses(from: BookingStatus) -> BTreeSet<BookingStatus> {
    from.successors().iter().copied().collect()
}

/// `true` iff `to` is one of `from`'s successors.
///
/// Moving a booking to the status it already holds is never valid; callers
/// that want idempotent updates must treat `from == to` themselves.
pub fn valid_transition(from: BookingStatus, to: BookingStatus) -> bool {
    from.successors().contains(&to)
}

/// [`valid_transition`] as a `Result`, carrying a message fit for the user.
///
/// # Errors
/// Returns [`TransitionError`] when the lifecycle does not allow `from → to`.
pub fn check_transition(from: BookingStatus, to: BookingStatus) -> Result<(), TransitionError> {
    if valid_transition(from, to) {
        Ok(())
    } else {
        debug!(%from, %to, "rejected booking status change");
        Err(TransitionError { from, to })
    }
}
