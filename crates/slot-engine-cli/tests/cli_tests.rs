//! Integration tests for the `slots` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the resolve,
//! offset and timezones subcommands through the actual binary, including
//! stdin input, file output, config loading and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: absolute path of a fixture file.
fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Helper: parse the JSON array of instants printed by `resolve`.
fn instants(stdout: &[u8]) -> Vec<String> {
    serde_json::from_slice(stdout).expect("resolve should print a JSON array of strings")
}

fn slots() -> Command {
    Command::cargo_bin("slots").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolve subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn resolve_range_without_busy_time() {
    // Monday 09:00-12:00 New York (EDT) is 13:00-16:00 UTC.
    let output = slots()
        .args([
            "resolve",
            "--schedule",
            &fixture("schedule.json"),
            "--event",
            &fixture("event.json"),
            "--from",
            "2026-03-16T13:00:00Z",
            "--to",
            "2026-03-16T16:00:00Z",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let times = instants(&output);
    assert_eq!(times.len(), 11);
    assert_eq!(times.first().unwrap(), "2026-03-16T13:00:00Z");
    assert_eq!(times.last().unwrap(), "2026-03-16T15:30:00Z");
}

#[test]
fn resolve_excludes_busy_intervals() {
    let output = slots()
        .args([
            "resolve",
            "--schedule",
            &fixture("schedule.json"),
            "--event",
            &fixture("event.json"),
            "--busy",
            &fixture("busy.json"),
            "--from",
            "2026-03-16T13:00:00Z",
            "--to",
            "2026-03-16T16:00:00Z",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let times = instants(&output);
    assert_eq!(times.len(), 7);
    assert_eq!(times.first().unwrap(), "2026-03-16T14:00:00Z");
}

#[test]
fn resolve_candidates_against_calendar_entries() {
    // The all-day entry blocks 2026-03-23; the timed one blocks 11:30 EDT.
    let output = slots()
        .args([
            "resolve",
            "--schedule",
            &fixture("schedule.json"),
            "--event",
            &fixture("event.json"),
            "--calendar",
            &fixture("calendar.json"),
            "--candidates",
            &fixture("candidates.json"),
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(
        instants(&output),
        vec!["2026-03-16T13:00:00Z", "2026-03-16T14:00:00Z"]
    );
}

#[test]
fn resolve_candidates_from_stdin() {
    let input = r#"["2026-03-16T15:45:00Z", "2026-03-16T13:15:00Z"]"#;

    let output = slots()
        .args([
            "resolve",
            "--schedule",
            &fixture("schedule.json"),
            "--event",
            &fixture("event.json"),
            "--candidates",
            "-",
        ])
        .write_stdin(input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    // 15:45 UTC + 30 min runs past 12:00 EDT.
    assert_eq!(instants(&output), vec!["2026-03-16T13:15:00Z"]);
}

#[test]
fn resolve_uses_step_from_config() {
    let output = slots()
        .args([
            "--config",
            &fixture("hourly.toml"),
            "resolve",
            "--schedule",
            &fixture("schedule.json"),
            "--event",
            &fixture("event.json"),
            "--from",
            "2026-03-16T13:00:00Z",
            "--to",
            "2026-03-16T16:00:00Z",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(
        instants(&output),
        vec![
            "2026-03-16T13:00:00Z",
            "2026-03-16T14:00:00Z",
            "2026-03-16T15:00:00Z"
        ]
    );
}

#[test]
fn resolve_writes_output_file() {
    let out = std::env::temp_dir().join(format!("slots-cli-test-{}.json", std::process::id()));

    slots()
        .args([
            "resolve",
            "--schedule",
            &fixture("schedule.json"),
            "--event",
            &fixture("event.json"),
            "--from",
            "2026-03-16T15:00:00Z",
            "--to",
            "2026-03-16T15:15:00Z",
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();

    let written = std::fs::read(&out).unwrap();
    std::fs::remove_file(&out).ok();
    assert_eq!(instants(&written), vec!["2026-03-16T15:00:00Z"]);
}

#[test]
fn resolve_rejects_zero_duration_event() {
    slots()
        .args([
            "resolve",
            "--schedule",
            &fixture("schedule.json"),
            "--event",
            &fixture("zero_event.json"),
            "--from",
            "2026-03-16T13:00:00Z",
            "--to",
            "2026-03-16T16:00:00Z",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid event"));
}

#[test]
fn resolve_reports_missing_files() {
    slots()
        .args([
            "resolve",
            "--schedule",
            "/nonexistent/schedule.json",
            "--event",
            &fixture("event.json"),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn resolve_rejects_bad_range_bounds() {
    slots()
        .args([
            "resolve",
            "--schedule",
            &fixture("schedule.json"),
            "--event",
            &fixture("event.json"),
            "--from",
            "yesterday",
            "--to",
            "2026-03-16T16:00:00Z",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid RFC 3339 datetime"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Offset / timezones subcommands
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn offset_prints_label() {
    slots()
        .args(["offset", "America/New_York", "--at", "2026-01-15T12:00:00Z"])
        .assert()
        .success()
        .stdout("GMT-5\n");
}

#[test]
fn offset_rejects_unknown_timezone() {
    slots()
        .args(["offset", "Atlantis/Capital", "--at", "2026-01-15T12:00:00Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn timezones_lists_labelled_zones() {
    slots()
        .args(["timezones", "--at", "2026-01-15T12:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Asia/Kolkata (GMT+5:30)"))
        .stdout(predicate::str::contains("Europe/London (GMT)"));
}

#[test]
fn bad_config_is_reported() {
    slots()
        .args([
            "--config",
            "/nonexistent/slots.toml",
            "offset",
            "UTC",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}
