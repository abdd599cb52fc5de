//! Reminder interval display and edit command.
//!
//! Editing the interval takes effect immediately: the persisted record is
//! updated, the next threshold is realigned to the new cadence, and a
//! running watcher is restarted so its timer picks up the change.

use crate::db::counters::Counters;
use crate::libs::clock::{self, Clock, SystemClock};
use crate::libs::config::Config;
use crate::libs::counter::{CounterStore, UsageRecord};
use crate::libs::daemon;
use crate::libs::messages::Message;
use crate::libs::tracker::align_threshold;
use crate::{msg_bail_anyhow, msg_info, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct IntervalArgs {
    /// New reminder interval in seconds; omit to show the current value
    seconds: Option<i64>,
}

pub fn cmd(args: IntervalArgs) -> Result<()> {
    let config = Config::read()?;
    let tracker_config = config.tracker.unwrap_or_default();

    let clock = SystemClock;
    let store = Counters::new(tracker_config.interval_seconds)?;
    let mut record = store.load()?;

    let seconds = match args.seconds {
        Some(seconds) => seconds,
        None => {
            msg_info!(Message::IntervalCurrent(record.interval_seconds));
            return Ok(());
        }
    };

    if seconds <= 0 {
        msg_bail_anyhow!(Message::IntervalMustBePositive);
    }

    // Day check first, like every other way into the record.
    if record.day != clock.today() {
        let mut fresh = UsageRecord::fresh(clock.today(), record.interval_seconds);
        fresh.service_running = record.service_running;
        record = fresh;
    }

    record.interval_seconds = seconds;
    let total_seconds = clock::elapsed_seconds(&record, clock.now_ms());
    record.next_threshold_seconds = align_threshold(total_seconds, seconds, record.last_notified_seconds);
    store.commit(&record)?;
    msg_success!(Message::IntervalUpdated(seconds));

    // Persist the new default for future days as well.
    let mut config = Config::read()?;
    let mut tracker_config = config.tracker.unwrap_or_default();
    tracker_config.interval_seconds = seconds;
    config.tracker = Some(tracker_config);
    config.save()?;

    if record.service_running && daemon::is_running()? {
        msg_info!(Message::WatcherRestarting);
        daemon::spawn()?;
    }

    Ok(())
}
