//! Integration tests for the `slots` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the expand, dates,
//! next and check subcommands through the actual binary, including stdin/stdout
//! piping, file I/O and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Weekly event, three occurrences, one booking off the series.
const WEEKLY_EVENT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/weekly_event.json");

/// Monthly event with one unreadable booking date.
const BROKEN_BOOKING: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/broken_booking.json");

/// Daily event with no end condition.
const ENDLESS_EVENT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/endless_event.json");

fn slots() -> Command {
    Command::cargo_bin("slots").unwrap()
}

fn stdout_json(output: std::process::Output) -> serde_json::Value {
    let text = String::from_utf8(output.stdout).expect("stdout should be UTF-8");
    serde_json::from_str(&text).expect("stdout should be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// expand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn expand_file_to_stdout() {
    let output = slots()
        .args(["expand", "-i", WEEKLY_EVENT])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(output);
    let occurrences = json.as_array().expect("array of occurrences");
    assert_eq!(occurrences.len(), 3);
    assert_eq!(occurrences[0]["start"], "2024-01-01T10:00:00+00:00");
    assert_eq!(occurrences[2]["start"], "2024-01-15T10:00:00+00:00");
    assert_eq!(occurrences[2]["end"], "2024-01-15T11:00:00+00:00");
}

#[test]
fn expand_stdin_to_stdout() {
    let input = std::fs::read_to_string(WEEKLY_EVENT).unwrap();

    slots()
        .arg("expand")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-08T10:00:00+00:00"));
}

#[test]
fn expand_window_limits_output() {
    let output = slots()
        .args([
            "expand",
            "-i",
            WEEKLY_EVENT,
            "--from",
            "2024-01-05",
            "--to",
            "2024-01-10",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(output);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["start"], "2024-01-08T10:00:00+00:00");
}

#[test]
fn expand_window_needs_both_bounds() {
    slots()
        .args(["expand", "-i", WEEKLY_EVENT, "--from", "2024-01-05"])
        .assert()
        .failure();
}

#[test]
fn expand_to_file() {
    let output_path = std::env::temp_dir().join("slots-test-expand-output.json");
    let _ = std::fs::remove_file(&output_path);

    slots()
        .args(["expand", "-i", WEEKLY_EVENT, "-o"])
        .arg(&output_path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 3);

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn expand_unbounded_rule_fails() {
    slots()
        .args(["expand", "-i", ENDLESS_EVENT])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "needs an occurrence count or an until date",
        ));
}

#[test]
fn dates_oversized_series_fails() {
    let event = r#"{
        "startAt": "2024-01-01T10:00:00Z",
        "endAt": "2024-01-01T11:00:00Z",
        "recurrence": {
            "frequency": "daily",
            "endCondition": { "type": "occurrenceCount", "value": 4294967295 }
        }
    }"#;

    slots()
        .arg("dates")
        .write_stdin(event)
        .assert()
        .failure()
        .stderr(predicate::str::contains("more than the limit of 10000"));
}

#[test]
fn expand_invalid_json_fails() {
    slots()
        .arg("expand")
        .write_stdin("this is not an event {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse event document"));
}

#[test]
fn expand_missing_file_fails() {
    slots()
        .args(["expand", "-i", "/nonexistent/event.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// dates
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn dates_include_off_schedule_bookings() {
    let output = slots()
        .args(["dates", "-i", WEEKLY_EVENT])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(output);
    assert_eq!(
        json["dates"],
        serde_json::json!(["2024-01-01", "2024-01-08", "2024-01-15", "2024-01-20"])
    );
    assert_eq!(json["offSchedule"], serde_json::json!(["2024-01-20"]));
    assert_eq!(json["warnings"], serde_json::json!([]));
}

#[test]
fn dates_skip_unreadable_booking_with_warning() {
    let output = slots()
        .args(["dates", "-i", BROKEN_BOOKING])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    assert!(stderr.contains("garbled"), "stderr was: {}", stderr);

    let json = stdout_json(output);
    assert_eq!(
        json["dates"],
        serde_json::json!(["2024-02-05", "2024-03-05", "2024-04-05"])
    );
    assert_eq!(json["warnings"][0]["bookingId"], "garbled");
    assert_eq!(json["warnings"][0]["value"], "next tuesday");
}

#[test]
fn dates_strict_rejects_unreadable_booking() {
    slots()
        .args(["dates", "--strict", "-i", BROKEN_BOOKING])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unreadable dates"));
}

// ─────────────────────────────────────────────────────────────────────────────
// next / check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn next_lists_successors_in_lifecycle_order() {
    slots()
        .args(["next", "confirmed"])
        .assert()
        .success()
        .stdout("rescheduled\ncompleted\ncancelled\nno_show\n");
}

#[test]
fn next_for_terminal_status_is_empty() {
    slots()
        .args(["next", "no-show"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn next_unknown_status_fails() {
    slots()
        .args(["next", "archived"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("archived"));
}

#[test]
fn check_allowed_transition() {
    slots()
        .args(["check", "pending", "confirmed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: Pending -> Confirmed"));
}

#[test]
fn check_rejected_transition() {
    slots()
        .args(["check", "completed", "pending"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "cannot move from Completed to Pending",
        ));
}

#[test]
fn check_self_transition_is_rejected() {
    slots()
        .args(["check", "confirmed", "confirmed"])
        .assert()
        .failure();
}

#[test]
fn no_subcommand_shows_usage() {
    slots()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn verbose_logs_expansion_to_stderr() {
    slots()
        .args(["--verbose", "expand", "-i", WEEKLY_EVENT])
        .assert()
        .success()
        .stderr(predicate::str::contains("expanded recurrence"));
}
