//! Text helpers shared by the row model and the controller.
//!
//! Covers the compact duration labels, the engine's timestamp format, splitting
//! operator input into engine arguments, and reading back the id of a created task.

use std::sync::OnceLock;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use regex::Regex;

/// Compact UTC form used for every engine timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Descending unit ladder, in seconds.
const UNITS: [(i64, &str); 7] = [
    (365 * DAY, "y"),
    (30 * DAY, "mo"),
    (7 * DAY, "w"),
    (DAY, "d"),
    (HOUR, "h"),
    (MINUTE, "min"),
    (1, "s"),
];

/// Format a span as the count of its largest whole unit ("3d", "2h", "59s").
///
/// Spans under one second, and negative spans, give an empty string.
pub fn format_duration(span: Duration) -> String {
    let secs = span.num_seconds();
    for (unit, label) in UNITS {
        let count = secs / unit;
        if count > 0 {
            return format!("{count}{label}");
        }
    }
    String::new()
}

/// Parse an engine timestamp. Anything not in the exact compact form is `None`.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if s.len() != 16 {
        return None;
    }
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.and_utc())
}

/// Split a line into engine arguments on spaces.
///
/// A `'` toggles a quoted region in which spaces do not split. Quote characters stay
/// in the tokens. An unmatched quote keeps the rest of the line in one region.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '\'' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ' ' if !in_quotes => {
                if !current.is_empty() {
                    fields.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        fields.push(current);
    }
    fields
}

fn created_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Created task (\d+)\.").expect("valid pattern"))
}

/// Recover the new task id from the engine's `Created task <id>.` confirmation line.
pub fn parse_created_id(line: &str) -> Option<u64> {
    created_pattern()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
