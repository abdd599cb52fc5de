//! Time sources and the pure session-clock computation.
//!
//! The engine never reads the wall clock directly; it goes through the
//! [`Clock`] trait so tests can drive time by hand. The elapsed-time helpers
//! are pure functions over a counter snapshot, with clock-skew deltas clamped
//! to zero rather than surfaced as errors.

use crate::libs::counter::UsageRecord;
use chrono::{Local, NaiveDate, TimeZone};

/// Source of "now" for the tracking engine.
pub trait Clock: Send + Sync {
    /// Current wall-clock time as milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    /// Current local calendar date.
    fn today(&self) -> NaiveDate;

    /// Local midnight of `today()` as epoch milliseconds.
    fn start_of_day_ms(&self) -> i64;
}

/// The real local clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Local::now().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn start_of_day_ms(&self) -> i64 {
        let midnight = self.today().and_hms_opt(0, 0, 0).unwrap_or_default();
        match Local.from_local_datetime(&midnight) {
            chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => dt.timestamp_millis(),
            // A DST gap at midnight; fall back to interpreting it as UTC.
            chrono::LocalResult::None => midnight.and_utc().timestamp_millis(),
        }
    }
}

/// Whether the record currently has an open session.
pub fn is_open(record: &UsageRecord) -> bool {
    record.session_start.is_some()
}

/// Total active milliseconds "as of now": the closed accumulation plus the
/// open session's elapsed portion. Never negative; if the clock has moved
/// backwards past the session start the open delta counts as zero.
pub fn elapsed_ms(record: &UsageRecord, now_ms: i64) -> i64 {
    let open = match record.session_start {
        Some(start) => (now_ms - start).max(0),
        None => 0,
    };
    record.accum_ms.max(0) + open
}

/// Total active whole seconds "as of now".
pub fn elapsed_seconds(record: &UsageRecord, now_ms: i64) -> i64 {
    elapsed_ms(record, now_ms) / 1000
}
