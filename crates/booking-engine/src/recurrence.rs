//! Recurrence rules -- how often a bookable event repeats and when it stops.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, EngineError};

/// Longest series a rule may describe.
///
/// Expansion collects every occurrence, so a rule past this bound is rejected
/// by [`RecurrenceRule::validate`] before anything is generated. Ten thousand
/// daily occurrences cover more than 27 years.
pub const MAX_OCCURRENCES: u32 = 10_000;

/// How far apart consecutive occurrences are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Exactly one occurrence.
    #[default]
    Never,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Never,
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Frequency::Never => "never",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }

    pub const fn repeats(self) -> bool {
        !matches!(self, Frequency::Never)
    }

    /// Start of the occurrence `steps` calendar units after `start`.
    ///
    /// Always measured from the series start rather than from the previous
    /// occurrence, so a day clamped in a short month does not carry over:
    /// a monthly series from Jan 31 visits Feb 29 (2024) and then Mar 31.
    /// Returns `None` when the result falls outside chrono's representable
    /// range, or for any step past the first of a non-repeating event.
    pub(crate) fn advance(self, start: DateTime<Utc>, steps: u32) -> Option<DateTime<Utc>> {
        match self {
            Frequency::Never => (steps == 0).then_some(start),
            Frequency::Daily => start.checked_add_days(Days::new(u64::from(steps))),
            Frequency::Weekly => start.checked_add_days(Days::new(u64::from(steps) * 7)),
            Frequency::Monthly => start.checked_add_months(Months::new(steps)),
            Frequency::Yearly => steps
                .checked_mul(12)
                .and_then(|months| start.checked_add_months(Months::new(months))),
        }
    }

    /// Upper bound on the steps from `first` whose start day is still on or
    /// before `last`. Exact for daily and weekly series.
    fn steps_within(self, first: NaiveDate, last: NaiveDate) -> u64 {
        let days = (last - first).num_days().unsigned_abs();
        let months = i64::from(last.year() - first.year()) * 12 + i64::from(last.month())
            - i64::from(first.month());
        match self {
            Frequency::Never => 0,
            Frequency::Daily => days,
            Frequency::Weekly => days / 7,
            Frequency::Monthly => months.unsigned_abs(),
            Frequency::Yearly => u64::from((last.year() - first.year()).unsigned_abs()),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Frequency::ALL
            .into_iter()
            .find(|freq| freq.as_str() == normalized)
            .ok_or_else(|| EngineError::UnknownFrequency(s.to_string()))
    }
}

/// What stops a repeating series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum EndCondition {
    /// Stop after this many occurrences.
    OccurrenceCount(u32),
    /// Stop at the first occurrence whose start date is after this day.
    UntilDate(NaiveDate),
    /// Only valid for [`Frequency::Never`].
    #[default]
    None,
}

/// A frequency paired with its end condition.
///
/// The pairing is only checked when the rule is expanded (or explicitly via
/// [`RecurrenceRule::validate`]); a rule built from host data may be malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    #[serde(default)]
    pub end_condition: EndCondition,
}

impl RecurrenceRule {
    /// A single, non-repeating occurrence.
    pub const fn once() -> Self {
        Self {
            frequency: Frequency::Never,
            end_condition: EndCondition::None,
        }
    }

    pub const fn count(frequency: Frequency, occurrences: u32) -> Self {
        Self {
            frequency,
            end_condition: EndCondition::OccurrenceCount(occurrences),
        }
    }

    pub const fn until(frequency: Frequency, last_day: NaiveDate) -> Self {
        Self {
            frequency,
            end_condition: EndCondition::UntilDate(last_day),
        }
    }

    /// Check that the rule describes a finite series starting on `first_day`.
    ///
    /// # Errors
    /// - [`ConfigurationError::EndConditionOnSingleEvent`] for `Never` with a bound.
    /// - [`ConfigurationError::MissingEndCondition`] for a repeating rule without one.
    /// - [`ConfigurationError::ZeroOccurrenceCount`] for `OccurrenceCount(0)`.
    /// - [`ConfigurationError::UntilBeforeStart`] when the until date precedes `first_day`.
    /// - [`ConfigurationError::SeriesTooLong`] when the count, or the number of
    ///   occurrences the until date allows, exceeds [`MAX_OCCURRENCES`].
    pub fn validate(&self, first_day: NaiveDate) -> Result<(), ConfigurationError> {
        let longest = match (self.frequency, self.end_condition) {
            (Frequency::Never, EndCondition::None) => return Ok(()),
            (Frequency::Never, _) => return Err(ConfigurationError::EndConditionOnSingleEvent),
            (frequency, EndCondition::None) => {
                return Err(ConfigurationError::MissingEndCondition { frequency })
            }
            (_, EndCondition::OccurrenceCount(0)) => {
                return Err(ConfigurationError::ZeroOccurrenceCount)
            }
            (_, EndCondition::OccurrenceCount(n)) => u64::from(n),
            (_, EndCondition::UntilDate(until)) if until < first_day => {
                return Err(ConfigurationError::UntilBeforeStart {
                    until,
                    start: first_day,
                })
            }
            (frequency, EndCondition::UntilDate(until)) => {
                frequency.steps_within(first_day, until) + 1
            }
        };

        if longest > u64::from(MAX_OCCURRENCES) {
            return Err(ConfigurationError::SeriesTooLong {
                occurrences: longest,
                max: MAX_OCCURRENCES,
            });
        }
        Ok(())
    }

    /// RFC 5545 RRULE value for calendar feeds, e.g. `FREQ=WEEKLY;COUNT=3`.
    ///
    /// Returns `None` for a non-repeating rule. The until date becomes the last
    /// second of that day in UTC. RFC 5545 consumers skip months that lack the
    /// start day (e.g. the 31st) where this crate clamps to the month's last day,
    /// so feeds for such series will differ on those months.
    pub fn to_rrule(&self) -> Option<String> {
        let freq = match self.frequency {
            Frequency::Never => return None,
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        };
        let bound = match self.end_condition {
            EndCondition::OccurrenceCount(n) => format!(";COUNT={}", n),
            EndCondition::UntilDate(until) => format!(";UNTIL={}T235959Z", until.format("%Y%m%d")),
            EndCondition::None => String::new(),
        };
        Some(format!("FREQ={}{}", freq, bound))
    }
}
