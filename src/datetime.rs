//! Floating (timezone-less) date-time values.
//!
//! Itinerary dates are wall-clock readings in the trip's own locale. They are
//! kept as a `(date_key, minutes_of_day)` pair and never turned into an
//! instant, so a viewer in another timezone sees the same ordering and the
//! same day buckets as someone standing in the trip's city.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Date key assigned to records whose date could not be parsed.
pub const SENTINEL_DATE_KEY: &str = "0000-00-00";

static FLOATING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})(?: ([0-9]{2}):([0-9]{2}))?$")
        .expect("static regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognized date shape: {0:?}")]
    Shape(String),
    #[error("date out of range: {0:?}")]
    Calendar(String),
    #[error("time out of range: {0:?}")]
    Clock(String),
}

/// A wall-clock reading with no timezone attached.
///
/// Field order matters: the derived `Ord` compares `date_key` first and
/// `minutes_of_day` second, which is chronological because keys are
/// zero-padded ISO dates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FloatingDateTime {
    pub date_key: String,
    pub minutes_of_day: u32,
}

impl FloatingDateTime {
    pub fn sentinel() -> Self {
        Self {
            date_key: SENTINEL_DATE_KEY.to_string(),
            minutes_of_day: 0,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.date_key == SENTINEL_DATE_KEY
    }

    /// Reads a local wall-clock moment the same way a raw itinerary string is
    /// read: date digits and hour/minute only, seconds dropped.
    pub fn from_local(now: NaiveDateTime) -> Self {
        Self {
            date_key: now.date().format("%Y-%m-%d").to_string(),
            minutes_of_day: now.hour() * 60 + now.minute(),
        }
    }

    /// `HH:mm` for display.
    pub fn time_label(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.minutes_of_day / 60,
            self.minutes_of_day % 60
        )
    }
}

impl fmt::Display for FloatingDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date_key, self.time_label())
    }
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DD HH:mm`.
///
/// Date-only input lands on minute 0 so it sorts first within its day.
pub fn parse_floating(raw: &str) -> Result<FloatingDateTime, ParseError> {
    let caps = FLOATING_RE
        .captures(raw)
        .ok_or_else(|| ParseError::Shape(raw.to_string()))?;

    let field = |i: usize| -> Result<Option<u32>, ParseError> {
        caps.get(i)
            .map(|m| m.as_str().parse::<u32>())
            .transpose()
            .map_err(|_| ParseError::Shape(raw.to_string()))
    };
    let required = |i: usize| -> Result<u32, ParseError> {
        field(i)?.ok_or_else(|| ParseError::Shape(raw.to_string()))
    };

    let year = required(1)?;
    let month = required(2)?;
    let day = required(3)?;
    let date = i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
        .ok_or_else(|| ParseError::Calendar(raw.to_string()))?;

    let minutes_of_day = match (field(4)?, field(5)?) {
        (Some(hour), Some(minute)) => {
            let time = NaiveTime::from_hms_opt(hour, minute, 0)
                .ok_or_else(|| ParseError::Clock(raw.to_string()))?;
            time.hour() * 60 + time.minute()
        }
        _ => 0,
    };

    Ok(FloatingDateTime {
        date_key: format!("{:04}-{:02}-{:02}", year, date.month(), date.day()),
        minutes_of_day,
    })
}

/// Parse, substituting the sentinel for anything malformed.
pub fn parse_or_sentinel(raw: &str) -> FloatingDateTime {
    match parse_floating(raw) {
        Ok(dt) => dt,
        Err(err) => {
            tracing::debug!(raw, %err, "using sentinel date");
            FloatingDateTime::sentinel()
        }
    }
}
