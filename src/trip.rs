//! Trip header helpers: date-range label and the trip-local clock.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

static OFFSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:GMT|UTC)?\s*([+-])(\d{1,2})(?::?(\d{2}))?$").expect("static regex")
});

fn header_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// `M/D - M/D` when both ends share a year, `Y/M/D - Y/M/D` otherwise.
///
/// An empty or unreadable start yields an empty label; an empty end yields
/// the start alone.
pub fn format_trip_range(start: &str, end: &str) -> String {
    let Some(start) = header_date(start) else {
        return String::new();
    };
    let end = header_date(end);
    let same_year = end.is_none_or(|e| e.year() == start.year());

    let label = |d: NaiveDate| {
        if same_year {
            format!("{}/{}", d.month(), d.day())
        } else {
            format!("{}/{}/{}", d.year(), d.month(), d.day())
        }
    };

    match end {
        Some(end) => format!("{} - {}", label(start), label(end)),
        None => label(start),
    }
}

/// Parse a declared timezone such as `GMT+8`, `UTC-03:30` or `+0545`.
pub fn parse_gmt_offset(declared: &str) -> Option<FixedOffset> {
    let trimmed = declared.trim();
    if trimmed.eq_ignore_ascii_case("GMT") || trimmed.eq_ignore_ascii_case("UTC") {
        return FixedOffset::east_opt(0);
    }
    let caps = OFFSET_RE.captures(trimmed)?;
    let hours: i32 = caps.get(2)?.as_str().parse().ok()?;
    let minutes: i32 = caps
        .get(3)
        .map(|m| m.as_str().parse().unwrap_or(0))
        .unwrap_or(0);
    if hours > 14 || minutes > 59 {
        return None;
    }
    let seconds = hours * 3600 + minutes * 60;
    match caps.get(1)?.as_str() {
        "-" => FixedOffset::west_opt(seconds),
        _ => FixedOffset::east_opt(seconds),
    }
}

/// Wall-clock time at the trip's declared offset.
pub fn trip_local_time(now: DateTime<Utc>, declared: &str) -> Option<NaiveDateTime> {
    let offset = parse_gmt_offset(declared)?;
    Some(now.with_timezone(&offset).naive_local())
}
