//! Booking records as the persistence layer hands them to the engine.
//!
//! The engine only reads bookings. `date` is kept as the raw stored timestamp
//! because a malformed value must not prevent the rest of an event's bookings
//! from being reconciled; it is parsed on demand via [`Booking::day`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::lifecycle::BookingStatus;

/// Settlement state of a booking. Any value may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Partial,
    Refunded,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Pending,
        PaymentStatus::Paid,
        PaymentStatus::Partial,
        PaymentStatus::Refunded,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Partial => "Partial",
            PaymentStatus::Refunded => "Refunded",
        };
        f.write_str(label)
    }
}

impl FromStr for PaymentStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        PaymentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| EngineError::UnknownPaymentStatus(s.to_string()))
    }
}

/// A client's reservation against one occurrence of an event.
///
/// On the wire the price is `amountCents` (integer minor units). Hosts that
/// store a decimal `amount` in major units (`40.00`) are read too; at most two
/// decimal places are accepted and, when both fields are sent, they must agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "BookingRecord")]
pub struct Booking {
    pub id: String,
    pub event_id: String,
    pub client_id: String,
    /// Raw stored timestamp (RFC 3339, `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD`).
    pub date: String,
    pub participants: u32,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    /// Amount in minor currency units (cents).
    pub amount_cents: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookingRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    event_id: String,
    #[serde(default)]
    client_id: String,
    date: String,
    #[serde(default = "one")]
    participants: u32,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    status: BookingStatus,
    #[serde(default)]
    payment_status: PaymentStatus,
    #[serde(default)]
    amount_cents: Option<i64>,
    #[serde(default)]
    amount: Option<DecimalAmount>,
}

fn one() -> u32 {
    1
}

/// A major-unit amount, as a JSON number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalAmount {
    Number(serde_json::Number),
    Text(String),
}

impl DecimalAmount {
    fn to_cents(&self) -> Option<i64> {
        match self {
            DecimalAmount::Number(n) => match n.as_i64() {
                Some(major) => major.checked_mul(100),
                None => cents_from_decimal(&n.to_string()),
            },
            DecimalAmount::Text(text) => cents_from_decimal(text),
        }
    }
}

/// `"40"`, `"40.5"`, `"-0.25"` to cents; `None` past two decimal places.
fn cents_from_decimal(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (major, minor) = digits.split_once('.').unwrap_or((digits, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if major.is_empty() || minor.len() > 2 || !all_digits(major) || !all_digits(minor) {
        return None;
    }
    let major: i64 = major.parse().ok()?;
    let minor: i64 = format!("{:0<2}", minor).parse().ok()?;
    let cents = major.checked_mul(100)?.checked_add(minor)?;
    Some(if negative { -cents } else { cents })
}

impl TryFrom<BookingRecord> for Booking {
    type Error = EngineError;

    fn try_from(record: BookingRecord) -> std::result::Result<Self, Self::Error> {
        let invalid = |reason: String| EngineError::InvalidBooking {
            id: record.id.clone(),
            reason,
        };
        let from_amount = match &record.amount {
            Some(amount) => Some(amount.to_cents().ok_or_else(|| {
                invalid("amount must be a decimal with at most two places".to_string())
            })?),
            None => None,
        };
        let amount_cents = match (record.amount_cents, from_amount) {
            (Some(cents), Some(converted)) if cents != converted => {
                return Err(invalid(format!(
                    "amount and amountCents disagree ({} vs {} cents)",
                    converted, cents
                )))
            }
            (Some(cents), _) | (None, Some(cents)) => cents,
            (None, None) => 0,
        };

        Ok(Self {
            id: record.id,
            event_id: record.event_id,
            client_id: record.client_id,
            date: record.date,
            participants: record.participants,
            notes: record.notes,
            status: record.status,
            payment_status: record.payment_status,
            amount_cents,
        })
    }
}

impl Booking {
    /// A pending, unpaid booking for a single participant.
    pub fn new(
        id: impl Into<String>,
        event_id: impl Into<String>,
        client_id: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            event_id: event_id.into(),
            client_id: client_id.into(),
            date: date.into(),
            participants: 1,
            notes: None,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            amount_cents: 0,
        }
    }

    /// Calendar day this booking is for.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidTimestamp`] if `date` cannot be parsed.
    pub fn day(&self) -> Result<NaiveDate> {
        parse_day(&self.date)
    }

    /// Check the record's field constraints.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidBooking`] naming the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| EngineError::InvalidBooking {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id is required"));
        }
        if self.event_id.trim().is_empty() {
            return Err(invalid("eventId is required"));
        }
        if self.client_id.trim().is_empty() {
            return Err(invalid("clientId is required"));
        }
        if self.participants < 1 {
            return Err(invalid("participants must be at least 1"));
        }
        if self.amount_cents < 0 {
            return Err(invalid("amount must not be negative"));
        }
        if let Err(err) = self.day() {
            return Err(invalid(&err.to_string()));
        }
        Ok(())
    }
}

/// Parse a timestamp into UTC.
///
/// Accepts RFC 3339 (with offset, e.g. "2024-01-08T10:00:00+01:00") and naive
/// datetimes (e.g. "2024-01-08T10:00:00"), which are taken to be UTC.
///
/// # Errors
/// Returns [`EngineError::InvalidTimestamp`] for anything else.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let trimmed = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    trimmed
        .parse::<NaiveDateTime>()
        .map(|ndt| ndt.and_utc())
        .map_err(|e| EngineError::InvalidTimestamp(format!("'{}': {}", s, e)))
}

/// Parse a timestamp or a bare `YYYY-MM-DD` date into a calendar day.
///
/// # Errors
/// Returns [`EngineError::InvalidTimestamp`] if `s` is neither.
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    if let Ok(date) = s.trim().parse::<NaiveDate>() {
        return Ok(date);
    }
    parse_timestamp(s).map(|dt| dt.date_naive())
}
