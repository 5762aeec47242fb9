//! RFC 5545 parity — cross-checks expansion against the `rrule` crate.
//!
//! For start days that exist in every month (1st-28th) the calendar stepping
//! here must agree with an RFC 5545 engine fed the rule's `to_rrule()` text.
//! Past the 28th the two deliberately differ: RFC 5545 drops months without
//! the start day, while this crate clamps to the month's last day.

use booking_engine::{expand, Frequency, RecurrenceRule, TimeInterval};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rrule::RRuleSet;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn base_at(start: DateTime<Utc>) -> TimeInterval {
    TimeInterval::new(start, start + Duration::minutes(45)).unwrap()
}

/// Expand `rule` from `start` with the `rrule` crate, returning UTC starts.
fn reference_starts(start: DateTime<Utc>, rule: &RecurrenceRule) -> Vec<DateTime<Utc>> {
    let rrule_value = rule.to_rrule().expect("repeating rule");
    let text = format!(
        "DTSTART;TZID=UTC:{}\nRRULE:{}",
        start.format("%Y%m%dT%H%M%S"),
        rrule_value
    );
    let set: RRuleSet = text.parse().expect("rrule crate should accept the rule");
    set.all(1000)
        .dates
        .into_iter()
        .map(|dt| dt.with_timezone(&Utc))
        .collect()
}

fn our_starts(start: DateTime<Utc>, rule: RecurrenceRule) -> Vec<DateTime<Utc>> {
    expand(base_at(start), rule)
        .unwrap()
        .iter()
        .map(TimeInterval::start)
        .collect()
}

fn dates(starts: &[DateTime<Utc>]) -> Vec<(i32, u32, u32)> {
    starts
        .iter()
        .map(|s| (s.year(), s.month(), s.day()))
        .collect()
}

// ===========================================================================
// RRULE text
// ===========================================================================

#[test]
fn rrule_text_for_count_and_until() {
    assert_eq!(
        RecurrenceRule::count(Frequency::Weekly, 3).to_rrule().as_deref(),
        Some("FREQ=WEEKLY;COUNT=3")
    );
    assert_eq!(
        RecurrenceRule::until(Frequency::Monthly, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
            .to_rrule()
            .as_deref(),
        Some("FREQ=MONTHLY;UNTIL=20240315T235959Z")
    );
    assert_eq!(RecurrenceRule::once().to_rrule(), None);
}

// ===========================================================================
// Fixed vectors
// ===========================================================================

#[test]
fn weekly_count_matches_rfc() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
    let rule = RecurrenceRule::count(Frequency::Weekly, 3);

    assert_eq!(our_starts(start, rule), reference_starts(start, &rule));
}

#[test]
fn monthly_until_matches_rfc() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
    let rule = RecurrenceRule::until(Frequency::Monthly, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());

    let ours = our_starts(start, rule);
    assert_eq!(ours, reference_starts(start, &rule));
    assert_eq!(dates(&ours), vec![(2024, 1, 1), (2024, 2, 1), (2024, 3, 1)]);
}

#[test]
fn daily_until_end_of_day_matches_rfc() {
    // 23:00 on the until day is still inside UNTIL=...T235959Z.
    let start = Utc.with_ymd_and_hms(2024, 2, 26, 23, 0, 0).unwrap();
    let rule = RecurrenceRule::until(Frequency::Daily, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());

    let ours = our_starts(start, rule);
    assert_eq!(ours.len(), 6);
    assert_eq!(ours, reference_starts(start, &rule));
}

#[test]
fn month_end_start_diverges_from_rfc_by_clamping() {
    let start = Utc.with_ymd_and_hms(2024, 1, 31, 9, 0, 0).unwrap();
    let rule = RecurrenceRule::count(Frequency::Monthly, 3);

    // RFC 5545 skips February and April entirely.
    assert_eq!(
        dates(&reference_starts(start, &rule)),
        vec![(2024, 1, 31), (2024, 3, 31), (2024, 5, 31)]
    );
    // Clamping keeps one occurrence per month.
    assert_eq!(
        dates(&our_starts(start, rule)),
        vec![(2024, 1, 31), (2024, 2, 29), (2024, 3, 31)]
    );
}

// ===========================================================================
// Property: agreement for every start day that exists in all months
// ===========================================================================

fn arb_repeating() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Daily),
        Just(Frequency::Weekly),
        Just(Frequency::Monthly),
        Just(Frequency::Yearly),
    ]
}

fn arb_start() -> impl Strategy<Value = DateTime<Utc>> {
    (2024i32..=2026, 1u32..=12, 1u32..=28, 0u32..=23, 0u32..=59)
        .prop_map(|(y, m, d, h, min)| Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, ..ProptestConfig::default() })]

    #[test]
    fn count_rules_agree_with_rfc(
        start in arb_start(),
        freq in arb_repeating(),
        count in 1u32..=24,
    ) {
        let rule = RecurrenceRule::count(freq, count);
        prop_assert_eq!(our_starts(start, rule), reference_starts(start, &rule));
    }

    #[test]
    fn until_rules_agree_with_rfc(
        start in arb_start(),
        freq in arb_repeating(),
        offset in 0i64..=400,
    ) {
        let rule = RecurrenceRule::until(freq, start.date_naive() + Duration::days(offset));
        prop_assert_eq!(our_starts(start, rule), reference_starts(start, &rule));
    }
}
