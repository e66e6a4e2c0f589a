//! Ward civil time.
//!
//! All stored timestamps are wall-clock time at a fixed UTC+8 offset. This is
//! a constant offset, not a time zone: there are no daylight-saving rules.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use std::sync::Mutex;

use super::record::STAMP_FORMAT;

pub const WARD_OFFSET_SECONDS: i32 = 8 * 3600;

pub fn ward_offset() -> FixedOffset {
    FixedOffset::east_opt(WARD_OFFSET_SECONDS).expect("UTC+8 is a valid offset")
}

/// Source of "now" for transitions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Reads the system clock and shifts it to ward time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        now_local()
    }
}

/// Current ward time.
pub fn now_local() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&ward_offset())
}

/// Clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    at: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self { at: Mutex::new(at) }
    }

    /// Pin the clock to a ward-time string in storage format.
    pub fn at(text: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self::new(parse_local(text)?))
    }

    pub fn set(&self, text: &str) -> Result<(), chrono::ParseError> {
        let at = parse_local(text)?;
        *self.at.lock().unwrap_or_else(|e| e.into_inner()) = at;
        Ok(())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.at.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_local(text: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    let naive = NaiveDateTime::parse_from_str(text, STAMP_FORMAT)?;
    let utc = naive - chrono::Duration::seconds(i64::from(WARD_OFFSET_SECONDS));
    Ok(ward_offset().from_utc_datetime(&utc))
}
