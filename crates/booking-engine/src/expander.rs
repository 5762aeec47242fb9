//! Occurrence expansion -- turns a base interval and a recurrence rule into
//! concrete, bookable time intervals.
//!
//! Expansion is a pure function of its inputs: the k-th occurrence is the base
//! interval shifted by k calendar units, and the end condition is checked
//! before each occurrence is produced so the series never overshoots its bound.

use std::iter::FusedIterator;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigurationError, Result};
use crate::recurrence::{EndCondition, RecurrenceRule};

/// A half-open span of time with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalFields")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct IntervalFields {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<IntervalFields> for TimeInterval {
    type Error = ConfigurationError;

    fn try_from(fields: IntervalFields) -> std::result::Result<Self, Self::Error> {
        TimeInterval::new(fields.start, fields.end)
    }
}

impl TimeInterval {
    /// # Errors
    /// Returns [`ConfigurationError::EmptyInterval`] unless `end > start`.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> std::result::Result<Self, ConfigurationError> {
        if end <= start {
            return Err(ConfigurationError::EmptyInterval { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Calendar day the interval starts on.
    pub fn start_day(&self) -> NaiveDate {
        self.start.date_naive()
    }
}

/// Lazy, finite iterator over the occurrences of a validated rule.
///
/// Cloning yields an independent iterator from the same position; a fresh
/// call to [`occurrences`] always restarts from the base interval.
#[derive(Debug, Clone)]
pub struct Occurrences {
    base: TimeInterval,
    rule: RecurrenceRule,
    emitted: u32,
    finished: bool,
}

impl Occurrences {
    /// The occurrence at the current position, or `None` if the end condition
    /// (or the calendar's range) has been reached.
    fn upcoming(&self) -> Option<TimeInterval> {
        if let EndCondition::OccurrenceCount(limit) = self.rule.end_condition {
            if self.emitted >= limit {
                return None;
            }
        }

        let start = self.rule.frequency.advance(self.base.start, self.emitted)?;

        if let EndCondition::UntilDate(until) = self.rule.end_condition {
            if start.date_naive() > until {
                return None;
            }
        }

        let end = start.checked_add_signed(self.base.duration())?;
        Some(TimeInterval { start, end })
    }
}

impl Iterator for Occurrences {
    type Item = TimeInterval;

    fn next(&mut self) -> Option<TimeInterval> {
        if self.finished {
            return None;
        }
        match self.upcoming() {
            Some(occurrence) => {
                self.emitted += 1;
                Some(occurrence)
            }
            None => {
                self.finished = true;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        match self.rule.end_condition {
            EndCondition::OccurrenceCount(limit) => {
                (0, Some(limit.saturating_sub(self.emitted) as usize))
            }
            EndCondition::None => (0, Some(1usize.saturating_sub(self.emitted as usize))),
            EndCondition::UntilDate(_) => (0, None),
        }
    }
}

impl FusedIterator for Occurrences {}

/// Validate `rule` against `base` and return a lazy iterator over its occurrences.
///
/// # Errors
/// Returns [`crate::EngineError::Configuration`] if the rule is malformed or
/// could never terminate (see [`RecurrenceRule::validate`]).
pub fn occurrences(base: TimeInterval, rule: RecurrenceRule) -> Result<Occurrences> {
    rule.validate(base.start_day())?;
    Ok(Occurrences {
        base,
        rule,
        emitted: 0,
        finished: false,
    })
}

/// Expand a recurrence rule into every occurrence it produces.
///
/// - `Never` yields `[base]` unchanged.
/// - `Daily`/`Weekly` step by 1/7 days, `Monthly`/`Yearly` by calendar months
///   and years, clamping to the last day of shorter months.
/// - Every occurrence keeps the base interval's exact duration.
///
/// # Errors
/// Returns [`crate::EngineError::Configuration`] if the rule is malformed,
/// could never terminate, or describes more than [`crate::MAX_OCCURRENCES`].
pub fn expand(base: TimeInterval, rule: RecurrenceRule) -> Result<Vec<TimeInterval>> {
    let expanded: Vec<TimeInterval> = occurrences(base, rule)?.collect();
    debug!(
        frequency = %rule.frequency,
        count = expanded.len(),
        "expanded recurrence"
    );
    Ok(expanded)
}

/// Expand only the occurrences whose start date falls within `from..=to`.
///
/// Generation stops at the first occurrence past `to`, so a calendar view over
/// a long series does not pay for the whole series. An inverted window yields
/// nothing.
///
/// # Errors
/// Same as [`expand`].
pub fn expand_between(
    base: TimeInterval,
    rule: RecurrenceRule,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<TimeInterval>> {
    let series = occurrences(base, rule)?;
    if from > to {
        return Ok(Vec::new());
    }
    Ok(series
        .skip_while(|occurrence| occurrence.start_day() < from)
        .take_while(|occurrence| occurrence.start_day() <= to)
        .collect())
}
