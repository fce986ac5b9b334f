use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Utc};

/// Source of "now". Read once per render and passed down as a value.
pub trait Clock {
    /// Current UTC instant.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current wall-clock reading on the viewer's device.
    fn now_local(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to one wall-clock reading, for `--now` and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    local: NaiveDateTime,
    offset: FixedOffset,
}

impl FixedClock {
    /// Pins `local` as read on this machine. The system timezone supplies the
    /// offset; a reading skipped by a DST jump falls back to UTC.
    pub fn new(local: NaiveDateTime) -> Self {
        let offset = Local
            .offset_from_local_datetime(&local)
            .earliest()
            .map(|o| o.fix())
            .unwrap_or_else(|| Utc.fix());
        Self::with_offset(local, offset)
    }

    pub fn with_offset(local: NaiveDateTime, offset: FixedOffset) -> Self {
        Self { local, offset }
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        (self.local - self.offset).and_utc()
    }

    fn now_local(&self) -> NaiveDateTime {
        self.local
    }
}
