//! The persistent usage counter: one logical record per device.
//!
//! The record carries everything the tracking engine needs to survive a
//! process restart: the day the accumulation belongs to, the closed portion
//! of today's active time, the open session start (if any), the next
//! reminder boundary, the configured cadence and the watcher flag. Stores
//! commit the whole record in a single call; there is no cross-call
//! transaction, so every mutation is a fresh load, a change, and a commit.

use anyhow::Result;
use chrono::NaiveDate;
use parking_lot::Mutex;

/// A consistent snapshot of today's usage accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRecord {
    /// Local date this accumulation belongs to.
    pub day: NaiveDate,
    /// Active milliseconds accumulated today, closed sessions only.
    pub accum_ms: i64,
    /// Wall-clock start of the open session (epoch ms), if one is open.
    pub session_start: Option<i64>,
    /// Next cumulative-seconds boundary a reminder is due at.
    pub next_threshold_seconds: i64,
    /// Reminder cadence in seconds.
    pub interval_seconds: i64,
    /// Whether the tracking watcher is currently active.
    pub service_running: bool,
    /// Highest boundary already notified today; 0 when none has fired.
    pub last_notified_seconds: i64,
}

impl UsageRecord {
    /// A fresh record for `day`: nothing accumulated, no open session, the
    /// first reminder due after one full interval.
    pub fn fresh(day: NaiveDate, interval_seconds: i64) -> Self {
        UsageRecord {
            day,
            accum_ms: 0,
            session_start: None,
            next_threshold_seconds: interval_seconds,
            interval_seconds,
            service_running: false,
            last_notified_seconds: 0,
        }
    }

    /// Fresh for today: no closed accumulation and no open session. This is
    /// the precondition for the backfill reconciler.
    pub fn is_untouched(&self) -> bool {
        self.accum_ms == 0 && self.session_start.is_none()
    }
}

/// Durable storage for the usage record.
///
/// `load` returns the latest committed snapshot, defaulted on first access.
/// `commit` applies the whole record atomically; concurrent readers may
/// interleave between calls but never observe a torn record.
pub trait CounterStore: Send + Sync {
    fn load(&self) -> Result<UsageRecord>;
    fn commit(&self, record: &UsageRecord) -> Result<()>;
}

/// In-memory store, used by tests and embedders that do not need durability.
pub struct MemoryCounterStore {
    record: Mutex<UsageRecord>,
}

impl MemoryCounterStore {
    pub fn new(day: NaiveDate, interval_seconds: i64) -> Self {
        MemoryCounterStore {
            record: Mutex::new(UsageRecord::fresh(day, interval_seconds)),
        }
    }
}

impl CounterStore for MemoryCounterStore {
    fn load(&self) -> Result<UsageRecord> {
        Ok(self.record.lock().clone())
    }

    fn commit(&self, record: &UsageRecord) -> Result<()> {
        *self.record.lock() = record.clone();
        Ok(())
    }
}
