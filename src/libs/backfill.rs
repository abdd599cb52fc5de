//! Cold-start reconstruction of today's usage from the transition log.
//!
//! When the watcher starts with a counter that has no progress for today
//! (nothing accumulated, no open session), it replays the interactive /
//! non-interactive transitions recorded since local midnight and rebuilds
//! the total from the closed intervals. A counter that already carries
//! progress is left untouched, and a log that cannot be read degrades to a
//! zero-accumulation start rather than an error.

use crate::libs::clock::{self, Clock};
use crate::libs::counter::CounterStore;
use crate::libs::messages::Message;
use crate::libs::tracker::align_threshold;
use crate::msg_debug;
use anyhow::Result;
use parking_lot::Mutex;

/// A device interactivity transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    InteractiveStart,
    InteractiveEnd,
}

/// One entry in the transition log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageEvent {
    /// Epoch milliseconds of the transition.
    pub timestamp_ms: i64,
    pub kind: EventKind,
}

/// Append-and-replay access to the transition history.
///
/// `query` returns events ordered by timestamp. Either operation may fail
/// (storage trouble, denied access); callers treat a failed query as "no
/// data" and a failed record as a logged warning, never a crash.
pub trait UsageEventLog: Send + Sync {
    fn record(&self, kind: EventKind, timestamp_ms: i64) -> Result<()>;
    fn query(&self, from_ms: i64, to_ms: i64) -> Result<Vec<UsageEvent>>;
}

/// In-memory transition log for tests and embedders.
#[derive(Default)]
pub struct MemoryEventLog {
    events: Mutex<Vec<UsageEvent>>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UsageEventLog for MemoryEventLog {
    fn record(&self, kind: EventKind, timestamp_ms: i64) -> Result<()> {
        self.events.lock().push(UsageEvent { timestamp_ms, kind });
        Ok(())
    }

    fn query(&self, from_ms: i64, to_ms: i64) -> Result<Vec<UsageEvent>> {
        let mut events: Vec<UsageEvent> = self
            .events
            .lock()
            .iter()
            .copied()
            .filter(|e| e.timestamp_ms >= from_ms && e.timestamp_ms <= to_ms)
            .collect();
        events.sort_by_key(|e| e.timestamp_ms);
        Ok(events)
    }
}

/// Replays today's transitions into the counter record.
///
/// Runs only when the record is untouched for today. Start events pair with
/// the next end event; a start with no matching end stays open and is not
/// credited. If the device is active right now a new session is opened at
/// `now` so the ongoing interval keeps counting, and the reminder boundary
/// is realigned against the rebuilt total.
///
/// Returns `true` when the record was rewritten.
pub fn reconcile(store: &dyn CounterStore, log: &dyn UsageEventLog, clock: &dyn Clock, currently_active: bool) -> Result<bool> {
    let mut record = store.load()?;
    if !record.is_untouched() {
        return Ok(false);
    }

    let now = clock.now_ms();
    let events = match log.query(clock.start_of_day_ms(), now) {
        Ok(events) => events,
        Err(e) => {
            msg_debug!("{}", Message::BackfillUnavailable(e.to_string()));
            return Ok(false);
        }
    };

    let mut accum_ms: i64 = 0;
    let mut open_start: Option<i64> = None;
    for event in events {
        match event.kind {
            // A repeated start moves the open interval forward; only the
            // latest start can pair with the next end.
            EventKind::InteractiveStart => open_start = Some(event.timestamp_ms),
            EventKind::InteractiveEnd => {
                if let Some(start) = open_start.take() {
                    accum_ms += (event.timestamp_ms - start).max(0);
                }
            }
        }
    }

    record.accum_ms = accum_ms.max(0);
    record.session_start = if currently_active { Some(now) } else { None };
    let total_seconds = clock::elapsed_seconds(&record, now);
    record.next_threshold_seconds = align_threshold(total_seconds, record.interval_seconds, record.last_notified_seconds);
    store.commit(&record)?;

    msg_debug!("{}", Message::BackfillApplied(record.accum_ms));
    Ok(true)
}
