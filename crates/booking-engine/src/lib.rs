//! # booking-engine
//!
//! Deterministic occurrence expansion, availability reconciliation and booking
//! lifecycle rules for bookable, possibly recurring events.
//!
//! Everything here is a pure, synchronous function of its inputs: no I/O, no
//! shared state, safe to call from any number of request handlers at once.
//!
//! ## Modules
//!
//! - [`recurrence`] — `Frequency`, `EndCondition`, `RecurrenceRule`
//! - [`expander`] — base interval + rule → concrete occurrence intervals
//! - [`availability`] — occurrences + bookings → bookable calendar days
//! - [`lifecycle`] — booking status state machine
//! - [`booking`] — booking records and timestamp parsing
//! - [`event`] — host event documents tying the pipeline together
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```rust
//! use booking_engine::{expand, reconcile, Booking, Frequency, RecurrenceRule, TimeInterval};
//! use chrono::{NaiveDate, TimeZone, Utc};
//!
//! let base = TimeInterval::new(
//!     Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap(),
//! )
//! .unwrap();
//! let occurrences = expand(base, RecurrenceRule::count(Frequency::Weekly, 2)).unwrap();
//!
//! let bookings = [Booking::new("b1", "evt", "client", "2024-01-20T09:00:00Z")];
//! let available = reconcile(&occurrences, &bookings);
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! assert_eq!(available.dates, vec![day(1), day(8), day(20)]);
//! ```

pub mod availability;
pub mod booking;
pub mod error;
pub mod event;
pub mod expander;
pub mod lifecycle;
pub mod recurrence;

pub use availability::{reconcile, AvailableDates};
pub use booking::{parse_day, parse_timestamp, Booking, PaymentStatus};
pub use error::{ConfigurationError, DataIntegrityWarning, EngineError, TransitionError};
pub use event::Event;
pub use expander::{expand, expand_between, occurrences, Occurrences, TimeInterval};
pub use lifecycle::{check_transition, next_statuses, valid_transition, BookingStatus};
pub use recurrence::{EndCondition, Frequency, RecurrenceRule, MAX_OCCURRENCES};
