//! A bookable event as loaded by the host: base interval, recurrence rule and
//! the bookings already made against it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::availability::{self, AvailableDates};
use crate::booking::{parse_timestamp, Booking};
use crate::error::Result;
use crate::expander::{self, TimeInterval};
use crate::recurrence::RecurrenceRule;

/// Host-side event document.
///
/// ```json
/// {
///   "id": "yoga-101",
///   "startAt": "2024-01-01T10:00:00Z",
///   "endAt": "2024-01-01T11:00:00Z",
///   "recurrence": { "frequency": "weekly", "endCondition": { "type": "occurrenceCount", "value": 3 } },
///   "bookings": [{ "id": "b1", "date": "2024-01-08T10:00:00Z", "status": "confirmed" }]
/// }
/// ```
///
/// `startAt` and `endAt` accept the same forms as booking dates' timestamps
/// (see [`parse_timestamp`]); naive values are read as UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub id: String,
    #[serde(deserialize_with = "timestamp")]
    pub start_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp")]
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub recurrence: RecurrenceRule,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

fn timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(de::Error::custom)
}

impl Event {
    /// # Errors
    /// Returns [`crate::EngineError::Document`] if `json` is not an event document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The stored base occurrence.
    ///
    /// # Errors
    /// Returns [`crate::EngineError::Configuration`] unless `endAt > startAt`.
    pub fn interval(&self) -> Result<TimeInterval> {
        Ok(TimeInterval::new(self.start_at, self.end_at)?)
    }

    /// Every occurrence of the event.
    ///
    /// # Errors
    /// See [`expander::expand`].
    pub fn occurrences(&self) -> Result<Vec<TimeInterval>> {
        expander::expand(self.interval()?, self.recurrence)
    }

    /// Occurrences starting within `from..=to`.
    ///
    /// # Errors
    /// See [`expander::expand_between`].
    pub fn occurrences_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<TimeInterval>> {
        expander::expand_between(self.interval()?, self.recurrence, from, to)
    }

    /// The date-picker list: generated occurrence days plus every booked day.
    ///
    /// # Errors
    /// Fails only if the recurrence rule or base interval is invalid; unreadable
    /// booking dates are reported as warnings in the result.
    pub fn available_dates(&self) -> Result<AvailableDates> {
        let occurrences = self.occurrences()?;
        Ok(availability::reconcile(&occurrences, &self.bookings))
    }
}
