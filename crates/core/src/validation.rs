//! Parsing and validation of caller-supplied dates, times and durations.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::errors::{SlotError, SlotResult};

/// Shortest bookable unit, in minutes.
pub const MIN_DURATION_MINUTES: i64 = 15;

/// Upper bound on entries accepted in one generation request.
pub const MAX_SLOTS_PER_REQUEST: usize = 96;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

static TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]?\d|2[0-3]):([0-5]\d)$").expect("valid time regex"));

/// Parses an ISO `YYYY-MM-DD` calendar date.
///
/// The string must have that exact shape and name a real day.
pub fn parse_date(raw: &str) -> SlotResult<NaiveDate> {
    if !DATE_PATTERN.is_match(raw) {
        return Err(SlotError::InvalidDate(format!(
            "'{raw}' does not match YYYY-MM-DD"
        )));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| SlotError::InvalidDate(format!("'{raw}' is not a calendar date")))
}

/// Parses a 24-hour `HH:MM` (or `H:MM`) time of day.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let captures = TIME_PATTERN.captures(raw)?;
    let hour = captures[1].parse().ok()?;
    let minute = captures[2].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Returns the duration as stored, or `None` when it is below the minimum
/// or does not fit the storage column.
pub fn parse_duration(minutes: i64) -> Option<i32> {
    if minutes < MIN_DURATION_MINUTES {
        return None;
    }
    i32::try_from(minutes).ok()
}
