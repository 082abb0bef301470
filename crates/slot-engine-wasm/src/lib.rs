//! WASM bindings for slot-engine.
//!
//! Exposes slot resolution and the booking page's timezone helpers to
//! JavaScript via `wasm-bindgen`. Complex types cross the boundary as JSON
//! strings; instants are ISO 8601 strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```
//!
//! The core is built without its `parallel` feature here, so resolution
//! always runs on the calling thread.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::Deserialize;
use slot_engine::model::{BusyInterval, Event, Schedule};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Busy interval as sent by the booking page.
#[derive(Deserialize)]
struct BusyInput {
    start: String,
    end: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (e.g. "2026-03-16T13:00:00Z") and naive datetimes
/// (e.g. "2026-03-16T13:00:00"), which are read as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, JsValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

fn parse_candidates_json(json: &str) -> Result<Vec<DateTime<Utc>>, JsValue> {
    let raw: Vec<String> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid candidates JSON: {}", e)))?;
    raw.iter().map(|s| parse_datetime(s)).collect()
}

fn parse_busy_json(json: &str) -> Result<Vec<BusyInterval>, JsValue> {
    let inputs: Vec<BusyInput> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid busy JSON: {}", e)))?;

    inputs
        .into_iter()
        .map(|input| {
            let start = parse_datetime(&input.start)?;
            let end = parse_datetime(&input.end)?;
            Ok(BusyInterval::new(start, end))
        })
        .collect()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Filter candidate start instants down to the bookable ones.
///
/// - `candidates_json` -- JSON array of ISO 8601 instants
/// - `event_json` -- event object (`duration_in_minutes` must be positive)
/// - `schedule_json` -- schedule object, or `null` when the owner has none
/// - `busy_json` -- JSON array of `{start, end}` objects
///
/// Returns a JSON array of RFC 3339 UTC instants in candidate order.
#[wasm_bindgen(js_name = "resolveValidTimes")]
pub fn resolve_valid_times(
    candidates_json: &str,
    event_json: &str,
    schedule_json: &str,
    busy_json: &str,
) -> Result<String, JsValue> {
    let candidates = parse_candidates_json(candidates_json)?;
    let event: Event = serde_json::from_str(event_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid event JSON: {}", e)))?;
    let schedule: Option<Schedule> = serde_json::from_str(schedule_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid schedule JSON: {}", e)))?;
    let busy = parse_busy_json(busy_json)?;

    let valid = slot_engine::resolve_valid_times(&candidates, &event, schedule.as_ref(), &busy)
        .map_err(to_js_error)?;

    let out: Vec<String> = valid
        .iter()
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .collect();
    serde_json::to_string(&out)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// UTC offset label of `timezone` at the instant `at`, e.g. `"GMT-5"`.
#[wasm_bindgen(js_name = "timezoneOffsetLabel")]
pub fn timezone_offset_label(timezone: &str, at: &str) -> Result<String, JsValue> {
    let at = parse_datetime(at)?;
    slot_engine::timezone_offset_label(timezone, at).map_err(to_js_error)
}

/// Minutes since midnight for an `"H:MM"` / `"HH:MM"` time of day.
#[wasm_bindgen(js_name = "timeToComparable")]
pub fn time_to_comparable(time: &str) -> Result<u32, JsValue> {
    slot_engine::time_to_comparable(time).map_err(to_js_error)
}

#[wasm_bindgen(js_name = "describeDuration")]
pub fn describe_duration(minutes: u32) -> String {
    slot_engine::describe_duration(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    // JsValue can only be constructed on wasm32, so native tests stick to
    // the success paths.

    const EVENT: &str = r#"{
        "id": "intro", "owner_id": "o", "name": "Intro",
        "duration_in_minutes": 30, "is_active": true
    }"#;

    const SCHEDULE: &str = r#"{
        "owner_id": "o", "timezone": "America/New_York",
        "availabilities": [
            {"day_of_week": "monday", "start_time": "9:00", "end_time": "12:00"}
        ]
    }"#;

    #[test]
    fn resolves_candidates_against_schedule_and_busy() {
        let candidates = r#"["2026-03-16T13:00:00Z", "2026-03-16T14:00:00", "2026-03-16T15:45:00Z"]"#;
        let busy = r#"[{"start": "2026-03-16T12:30:00Z", "end": "2026-03-16T13:15:00Z"}]"#;

        let json = resolve_valid_times(candidates, EVENT, SCHEDULE, busy).unwrap();
        let times: Vec<String> = serde_json::from_str(&json).unwrap();

        assert_eq!(times, vec!["2026-03-16T14:00:00Z"]);
    }

    #[test]
    fn null_schedule_resolves_to_nothing() {
        let json = resolve_valid_times(r#"["2026-03-16T13:00:00Z"]"#, EVENT, "null", "[]").unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn exposes_timezone_helpers() {
        assert_eq!(
            timezone_offset_label("Asia/Kolkata", "2026-01-15T12:00:00Z").unwrap(),
            "GMT+5:30"
        );
        assert_eq!(time_to_comparable("9:30").unwrap(), 570);
        assert_eq!(describe_duration(90), "1 hr 30 mins");
    }
}
