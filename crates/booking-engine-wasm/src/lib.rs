//! WASM bindings for booking-engine.
//!
//! Exposes occurrence expansion, availability reconciliation and the booking
//! lifecycle to the browser console via `wasm-bindgen`. Event documents and
//! results cross the boundary as JSON strings; statuses cross as their wire
//! names (`"pending"`, `"no_show"`, ...).
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p booking-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/booking-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/booking_engine_wasm.wasm
//! ```

use booking_engine::{BookingStatus, Event, TimeInterval};
use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct OccurrenceDto {
    start: String,
    end: String,
}

impl From<&TimeInterval> for OccurrenceDto {
    fn from(interval: &TimeInterval) -> Self {
        Self {
            start: interval.start().to_rfc3339(),
            end: interval.end().to_rfc3339(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_event(json: &str) -> Result<Event, JsValue> {
    Event::from_json(json).map_err(js_error)
}

fn parse_status(s: &str) -> Result<BookingStatus, JsValue> {
    s.parse().map_err(js_error)
}

fn parse_date(s: &str) -> Result<NaiveDate, JsValue> {
    booking_engine::parse_day(s).map_err(js_error)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn occurrences_json(occurrences: &[TimeInterval]) -> Result<String, JsValue> {
    let dtos: Vec<OccurrenceDto> = occurrences.iter().map(OccurrenceDto::from).collect();
    to_json(&dtos)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Expand an event document into its occurrences.
///
/// Returns a JSON array of `{start, end}` objects with RFC 3339 datetimes.
/// Fails if the document is malformed or its recurrence rule is invalid.
#[wasm_bindgen(js_name = "expandOccurrences")]
pub fn expand_occurrences(event_json: &str) -> Result<String, JsValue> {
    let event = parse_event(event_json)?;
    let occurrences = event.occurrences().map_err(js_error)?;
    occurrences_json(&occurrences)
}

/// Like [`expand_occurrences`], restricted to occurrences starting on a day
/// within `from..=to` (`YYYY-MM-DD` or any timestamp).
#[wasm_bindgen(js_name = "expandOccurrencesBetween")]
pub fn expand_occurrences_between(event_json: &str, from: &str, to: &str) -> Result<String, JsValue> {
    let event = parse_event(event_json)?;
    let occurrences = event
        .occurrences_between(parse_date(from)?, parse_date(to)?)
        .map_err(js_error)?;
    occurrences_json(&occurrences)
}

/// Compute the date-picker list for an event document.
///
/// Returns `{"dates": [...], "offSchedule": [...], "warnings": [...]}` with
/// `YYYY-MM-DD` dates. Unreadable booking dates become warnings, not errors.
#[wasm_bindgen(js_name = "availableDates")]
pub fn available_dates(event_json: &str) -> Result<String, JsValue> {
    let event = parse_event(event_json)?;
    let available = event.available_dates().map_err(js_error)?;
    to_json(&available)
}

/// JSON array of the statuses a booking in `status` may move to.
#[wasm_bindgen(js_name = "nextStatuses")]
pub fn next_statuses(status: &str) -> Result<String, JsValue> {
    let from = parse_status(status)?;
    let names: Vec<&str> = booking_engine::next_statuses(from)
        .into_iter()
        .map(BookingStatus::as_str)
        .collect();
    to_json(&names)
}

/// Whether a booking may move from `from` to `to`. Unknown status names are errors.
#[wasm_bindgen(js_name = "isValidTransition")]
pub fn is_valid_transition(from: &str, to: &str) -> Result<bool, JsValue> {
    Ok(booking_engine::valid_transition(
        parse_status(from)?,
        parse_status(to)?,
    ))
}

#[wasm_bindgen(js_name = "isTerminalStatus")]
pub fn is_terminal_status(status: &str) -> Result<bool, JsValue> {
    Ok(parse_status(status)?.is_terminal())
}
