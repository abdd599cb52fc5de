//! The usage-tracking engine: session accounting and threshold scheduling.
//!
//! One `Tracker` owns the whole state machine. Device edges, timer fires and
//! interval edits all arrive as [`TrackerEvent`]s on a single control
//! channel, so no two counter mutations ever race from within one running
//! instance; every mutation loads the latest committed record, changes it
//! and commits it back in one call.
//!
//! The reminder timer is a self-perpetuating one-shot chain rather than a
//! repeating timer: each fire recomputes the true elapsed total from the
//! store and arms the next shot from that, which corrects for late fires
//! and suspended intervals. Arming bumps a generation counter and the fire
//! carries its generation, so a fire that was already queued when the timer
//! was cancelled is recognized as stale and dropped.
//!
//! The day check runs first on every entry point, since any event may be
//! the first one observed after midnight.

use crate::libs::backfill::{self, EventKind, UsageEventLog};
use crate::libs::clock::{self, Clock};
use crate::libs::counter::CounterStore;
use crate::libs::device::DeviceStateSource;
use crate::libs::messages::Message;
use crate::libs::notifier::Notifier;
use crate::{msg_bail_anyhow, msg_debug, msg_error, msg_warning};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Events serialized onto the tracker's control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    /// The device transitioned into active use.
    BecameActive,
    /// The device left active use.
    BecameInactive,
    /// The armed one-shot reminder timer fired.
    ThresholdTimer { generation: u64 },
    /// The reminder cadence was edited at runtime.
    IntervalChanged(i64),
    /// Stop tracking and exit the control loop.
    Shutdown,
}

/// Smallest multiple of `interval_seconds` at or above `total_seconds`,
/// never below one full interval and always past the boundary most recently
/// notified today. Keeps the next threshold valid across interval edits
/// without ever re-notifying a crossed point.
pub fn align_threshold(total_seconds: i64, interval_seconds: i64, last_notified_seconds: i64) -> i64 {
    let interval = interval_seconds.max(1);
    let total = total_seconds.max(0);
    let mut next = ((total + interval - 1) / interval) * interval;
    if next < interval {
        next = interval;
    }
    while next <= last_notified_seconds {
        next += interval;
    }
    next
}

pub struct Tracker {
    store: Arc<dyn CounterStore>,
    log: Arc<dyn UsageEventLog>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    device: Arc<dyn DeviceStateSource>,
    tx: mpsc::Sender<TrackerEvent>,
    timer: Option<JoinHandle<()>>,
    generation: u64,
    backfilled: bool,
}

impl Tracker {
    pub fn new(
        store: Arc<dyn CounterStore>,
        log: Arc<dyn UsageEventLog>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        device: Arc<dyn DeviceStateSource>,
        tx: mpsc::Sender<TrackerEvent>,
    ) -> Self {
        Tracker {
            store,
            log,
            notifier,
            clock,
            device,
            tx,
            timer: None,
            generation: 0,
            backfilled: false,
        }
    }

    /// Re-establishes tracking from persisted state: day check, one-time
    /// backfill, running flag, then a synchronous evaluation of the current
    /// device state (the service may start mid-session, with no edge event
    /// coming). Idempotent.
    pub fn start(&mut self) -> Result<()> {
        self.rollover_if_needed()?;

        if !self.backfilled {
            backfill::reconcile(self.store.as_ref(), self.log.as_ref(), self.clock.as_ref(), self.device.is_active())?;
            self.backfilled = true;
        }

        let mut record = self.store.load()?;
        record.service_running = true;
        let total_seconds = clock::elapsed_seconds(&record, self.clock.now_ms());
        record.next_threshold_seconds = align_threshold(total_seconds, record.interval_seconds, record.last_notified_seconds);
        self.store.commit(&record)?;

        if self.device.is_active() {
            self.on_became_active()
        } else {
            self.on_became_inactive()
        }
    }

    /// Cancels the timer chain and clears the running flag. The open
    /// session, if any, stays in the record; the next start re-evaluates
    /// device state. Idempotent.
    pub fn stop(&mut self) -> Result<()> {
        self.cancel_timer();
        let mut record = self.store.load()?;
        if record.service_running {
            record.service_running = false;
            self.store.commit(&record)?;
        }
        Ok(())
    }

    /// Dispatches one serialized control event.
    pub fn handle_event(&mut self, event: TrackerEvent) -> Result<()> {
        match event {
            TrackerEvent::BecameActive => self.on_became_active(),
            TrackerEvent::BecameInactive => self.on_became_inactive(),
            TrackerEvent::ThresholdTimer { generation } => self.on_timer_fired(generation),
            TrackerEvent::IntervalChanged(seconds) => self.set_interval(seconds),
            TrackerEvent::Shutdown => self.stop(),
        }
    }

    /// Processes control events until the channel closes or a shutdown
    /// arrives. A failed event is logged and the loop keeps going; the next
    /// event retries against the latest persisted state.
    pub async fn run(&mut self, mut rx: mpsc::Receiver<TrackerEvent>) -> Result<()> {
        while let Some(event) = rx.recv().await {
            let shutdown = matches!(event, TrackerEvent::Shutdown);
            if let Err(e) = self.handle_event(event) {
                msg_error!(Message::TrackerEventFailed(e.to_string()));
            }
            if shutdown {
                break;
            }
        }
        self.stop()
    }

    /// Generation of the currently armed timer, for simulating fires.
    pub fn timer_generation(&self) -> u64 {
        self.generation
    }

    /// Whether a one-shot reminder timer is currently armed.
    pub fn has_pending_timer(&self) -> bool {
        self.timer.is_some()
    }

    // ── Entry points ─────────────────────────────────────────────────

    fn on_became_active(&mut self) -> Result<()> {
        self.rollover_if_needed()?;

        let mut record = self.store.load()?;
        if record.session_start.is_none() {
            record.session_start = Some(self.clock.now_ms());
            self.store.commit(&record)?;
            self.record_edge(EventKind::InteractiveStart);
        }

        self.schedule_next()
    }

    fn on_became_inactive(&mut self) -> Result<()> {
        self.rollover_if_needed()?;
        self.cancel_timer();

        let mut record = self.store.load()?;
        if let Some(start) = record.session_start {
            let now = self.clock.now_ms();
            record.accum_ms += (now - start).max(0);
            record.session_start = None;
            self.store.commit(&record)?;
            self.record_edge(EventKind::InteractiveEnd);
        }

        Ok(())
    }

    fn on_timer_fired(&mut self, generation: u64) -> Result<()> {
        if generation != self.generation {
            msg_debug!("dropping stale timer fire (generation {} != {})", generation, self.generation);
            return Ok(());
        }

        self.rollover_if_needed()?;
        self.ensure_threshold_and_notify()?;
        self.schedule_next()
    }

    fn set_interval(&mut self, interval_seconds: i64) -> Result<()> {
        if interval_seconds <= 0 {
            msg_bail_anyhow!(Message::IntervalMustBePositive);
        }

        self.rollover_if_needed()?;

        let mut record = self.store.load()?;
        record.interval_seconds = interval_seconds;
        let total_seconds = clock::elapsed_seconds(&record, self.clock.now_ms());
        record.next_threshold_seconds = align_threshold(total_seconds, interval_seconds, record.last_notified_seconds);
        self.store.commit(&record)?;

        self.schedule_next()
    }

    // ── Day rollover ─────────────────────────────────────────────────

    /// Resets accumulation when the stored day no longer matches today.
    /// An open session is discarded, not credited to the old day.
    fn rollover_if_needed(&mut self) -> Result<()> {
        let mut record = self.store.load()?;
        let today = self.clock.today();
        if record.day != today {
            record.day = today;
            record.accum_ms = 0;
            record.session_start = None;
            record.next_threshold_seconds = record.interval_seconds;
            record.last_notified_seconds = 0;
            self.store.commit(&record)?;
        }
        Ok(())
    }

    // ── Threshold scheduling ─────────────────────────────────────────

    /// Fires one reminder per crossed boundary. A long suspension may have
    /// skipped several boundaries; each still fires exactly once, in
    /// increasing order. The advanced threshold is persisted only when at
    /// least one crossing occurred.
    fn ensure_threshold_and_notify(&mut self) -> Result<()> {
        let mut record = self.store.load()?;
        let total_seconds = clock::elapsed_seconds(&record, self.clock.now_ms());

        let mut notified = false;
        while total_seconds >= record.next_threshold_seconds {
            self.notifier.notify(total_seconds / 60);
            record.last_notified_seconds = record.next_threshold_seconds;
            record.next_threshold_seconds += record.interval_seconds.max(1);
            notified = true;
        }

        if notified {
            self.store.commit(&record)?;
        }
        Ok(())
    }

    /// Cancels any pending shot and, while a session is open, arms the next
    /// one for the remaining time to the threshold (at least one second).
    fn schedule_next(&mut self) -> Result<()> {
        self.cancel_timer();

        let record = self.store.load()?;
        if record.session_start.is_none() {
            return Ok(()); // nothing to count
        }

        let total_seconds = clock::elapsed_seconds(&record, self.clock.now_ms());
        let remaining = (record.next_threshold_seconds - total_seconds).max(1) as u64;

        let generation = self.generation;
        let tx = self.tx.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(remaining)).await;
            let _ = tx.send(TrackerEvent::ThresholdTimer { generation }).await;
        }));
        Ok(())
    }

    /// Invalidates the armed timer. The generation bump also covers a fire
    /// that already made it onto the control channel before the abort.
    fn cancel_timer(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }

    fn record_edge(&self, kind: EventKind) {
        if let Err(e) = self.log.record(kind, self.clock.now_ms()) {
            msg_warning!(Message::EventLogRecordFailed(e.to_string()));
        }
    }
}
