//! Today's screen-time summary command.

use crate::db::counters::Counters;
use crate::libs::clock::{self, Clock, SystemClock};
use crate::libs::config::Config;
use crate::libs::counter::{CounterStore, UsageRecord};
use crate::libs::view::View;
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let config = Config::read()?;
    let tracker_config = config.tracker.unwrap_or_default();

    let clock = SystemClock;
    let store = Counters::new(tracker_config.interval_seconds)?;
    let mut record = store.load()?;

    // A record from a previous day is shown as today's zeroed view without
    // committing anything; the watcher owns the persisted rollover.
    if record.day != clock.today() {
        let mut fresh = UsageRecord::fresh(clock.today(), record.interval_seconds);
        fresh.service_running = record.service_running;
        record = fresh;
    }

    let total_ms = clock::elapsed_ms(&record, clock.now_ms());
    View::status(&record, total_ms)
}
