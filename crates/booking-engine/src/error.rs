//! Error types for booking-engine operations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::lifecycle::BookingStatus;
use crate::recurrence::Frequency;

/// A recurrence rule or base interval that cannot be expanded.
///
/// Raised before any occurrence is generated; malformed rules are never
/// coerced into something expandable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("a non-repeating event cannot carry an end condition")]
    EndConditionOnSingleEvent,

    #[error("a {frequency} rule needs an occurrence count or an until date")]
    MissingEndCondition { frequency: Frequency },

    #[error("occurrence count must be at least 1")]
    ZeroOccurrenceCount,

    #[error("until date {until} is before the first occurrence on {start}")]
    UntilBeforeStart { until: NaiveDate, start: NaiveDate },

    #[error("series would run to {occurrences} occurrences, more than the limit of {max}")]
    SeriesTooLong { occurrences: u64, max: u32 },

    #[error("interval end {end} is not after its start {start}")]
    EmptyInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// A booking record that could not take part in reconciliation.
///
/// Non-fatal: the reconciler skips the record and hands this back to the
/// caller next to the dates it could compute.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("booking {booking_id}: unreadable date '{value}' ({reason})")]
pub struct DataIntegrityWarning {
    pub booking_id: String,
    pub value: String,
    pub reason: String,
}

/// A status change the booking lifecycle does not allow.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot move from {from} to {to}")]
pub struct TransitionError {
    pub from: BookingStatus,
    pub to: BookingStatus,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid recurrence: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Invalid transition: {0}")]
    Transition(#[from] TransitionError),

    #[error("Invalid booking {id}: {reason}")]
    InvalidBooking { id: String, reason: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Unknown booking status: {0}")]
    UnknownStatus(String),

    #[error("Unknown payment status: {0}")]
    UnknownPaymentStatus(String),

    #[error("Unknown frequency: {0}")]
    UnknownFrequency(String),

    #[error("Invalid event document: {0}")]
    Document(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
