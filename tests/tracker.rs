#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, NaiveDate};
    use lumen::libs::backfill::{EventKind, MemoryEventLog, UsageEventLog};
    use lumen::libs::clock::Clock;
    use lumen::libs::counter::{CounterStore, MemoryCounterStore};
    use lumen::libs::device::ManualDeviceSource;
    use lumen::libs::notifier::Notifier;
    use lumen::libs::tracker::{Tracker, TrackerEvent};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    const DAY_MS: i64 = 86_400_000;

    /// Hand-driven clock so tests control elapsed time and midnight.
    struct MockClock {
        now_ms: AtomicI64,
        day: Mutex<NaiveDate>,
        start_of_day_ms: AtomicI64,
    }

    impl MockClock {
        fn new(day: NaiveDate, start_of_day_ms: i64) -> Self {
            MockClock {
                now_ms: AtomicI64::new(start_of_day_ms),
                day: Mutex::new(day),
                start_of_day_ms: AtomicI64::new(start_of_day_ms),
            }
        }

        fn advance_secs(&self, seconds: i64) {
            self.now_ms.fetch_add(seconds * 1000, Ordering::SeqCst);
        }

        fn next_day(&self) {
            let mut day = self.day.lock();
            *day += ChronoDuration::days(1);
            let midnight = self.start_of_day_ms.fetch_add(DAY_MS, Ordering::SeqCst) + DAY_MS;
            self.now_ms.store(midnight, Ordering::SeqCst);
        }
    }

    impl Clock for MockClock {
        fn now_ms(&self) -> i64 {
            self.now_ms.load(Ordering::SeqCst)
        }

        fn today(&self) -> NaiveDate {
            *self.day.lock()
        }

        fn start_of_day_ms(&self) -> i64 {
            self.start_of_day_ms.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        calls: Mutex<Vec<i64>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, total_minutes: i64) {
            self.calls.lock().push(total_minutes);
        }
    }

    struct Fixture {
        tracker: Tracker,
        clock: Arc<MockClock>,
        store: Arc<MemoryCounterStore>,
        log: Arc<MemoryEventLog>,
        notifier: Arc<RecordingNotifier>,
        device: Arc<ManualDeviceSource>,
        _rx: mpsc::Receiver<TrackerEvent>,
    }

    fn fixture(interval_seconds: i64) -> Fixture {
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let clock = Arc::new(MockClock::new(day, 1_000_000_000));
        let store = Arc::new(MemoryCounterStore::new(day, interval_seconds));
        let log = Arc::new(MemoryEventLog::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let device = Arc::new(ManualDeviceSource::new(false));
        let (tx, rx) = mpsc::channel(16);

        let tracker = Tracker::new(
            store.clone(),
            log.clone(),
            notifier.clone(),
            clock.clone(),
            device.clone(),
            tx,
        );
        Fixture { tracker, clock, store, log, notifier, device, _rx: rx }
    }

    /// Simulates the armed one-shot firing right now.
    fn fire_timer(f: &mut Fixture) {
        let generation = f.tracker.timer_generation();
        f.tracker.handle_event(TrackerEvent::ThresholdTimer { generation }).unwrap();
    }

    #[tokio::test]
    async fn test_became_active_opens_session_once() {
        let mut f = fixture(60);

        f.tracker.handle_event(TrackerEvent::BecameActive).unwrap();
        let first = f.store.load().unwrap();
        assert_eq!(first.session_start, Some(f.clock.now_ms()));
        assert!(f.tracker.has_pending_timer());

        // A repeated active edge must not move the session start.
        f.clock.advance_secs(10);
        f.tracker.handle_event(TrackerEvent::BecameActive).unwrap();
        let second = f.store.load().unwrap();
        assert_eq!(second.session_start, first.session_start);
        assert_eq!(second.accum_ms, 0);

        // Exactly one start edge in the log.
        let edges = f.log.query(0, i64::MAX).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].kind, EventKind::InteractiveStart);
    }

    #[tokio::test]
    async fn test_became_inactive_closes_and_accumulates() {
        let mut f = fixture(60);

        f.tracker.handle_event(TrackerEvent::BecameActive).unwrap();
        f.clock.advance_secs(10);
        f.tracker.handle_event(TrackerEvent::BecameInactive).unwrap();

        let record = f.store.load().unwrap();
        assert_eq!(record.accum_ms, 10_000);
        assert_eq!(record.session_start, None);
        assert!(!f.tracker.has_pending_timer());

        // A repeated inactive edge changes nothing.
        f.clock.advance_secs(10);
        f.tracker.handle_event(TrackerEvent::BecameInactive).unwrap();
        assert_eq!(f.store.load().unwrap().accum_ms, 10_000);
    }

    #[tokio::test]
    async fn test_repeated_sessions_accumulate_without_double_counting() {
        let mut f = fixture(300);

        f.tracker.handle_event(TrackerEvent::BecameActive).unwrap();
        f.clock.advance_secs(10);
        f.tracker.handle_event(TrackerEvent::BecameInactive).unwrap();

        // Idle gap must not count.
        f.clock.advance_secs(100);

        f.tracker.handle_event(TrackerEvent::BecameActive).unwrap();
        f.clock.advance_secs(15);
        f.tracker.handle_event(TrackerEvent::BecameInactive).unwrap();

        assert_eq!(f.store.load().unwrap().accum_ms, 25_000);
    }

    #[tokio::test]
    async fn test_timer_fire_notifies_every_skipped_boundary() {
        let mut f = fixture(60);

        f.tracker.handle_event(TrackerEvent::BecameActive).unwrap();
        // Suspended long enough to skip past four boundaries.
        f.clock.advance_secs(250);
        fire_timer(&mut f);

        // 60, 120, 180 and 240 each fire once, all reporting the current total.
        assert_eq!(*f.notifier.calls.lock(), vec![4, 4, 4, 4]);
        let record = f.store.load().unwrap();
        assert_eq!(record.next_threshold_seconds, 300);
        assert_eq!(record.last_notified_seconds, 240);
        assert!(f.tracker.has_pending_timer());
    }

    #[tokio::test]
    async fn test_no_notification_before_first_boundary() {
        let mut f = fixture(60);

        f.tracker.handle_event(TrackerEvent::BecameActive).unwrap();
        f.clock.advance_secs(59);
        fire_timer(&mut f);

        assert!(f.notifier.calls.lock().is_empty());
        assert_eq!(f.store.load().unwrap().next_threshold_seconds, 60);
    }

    #[tokio::test]
    async fn test_stale_timer_fire_is_dropped() {
        let mut f = fixture(60);

        f.tracker.handle_event(TrackerEvent::BecameActive).unwrap();
        let stale = f.tracker.timer_generation();
        f.clock.advance_secs(70);
        // Closing the session cancels the timer; its queued fire is stale now.
        f.tracker.handle_event(TrackerEvent::BecameInactive).unwrap();

        f.tracker.handle_event(TrackerEvent::ThresholdTimer { generation: stale }).unwrap();

        assert!(f.notifier.calls.lock().is_empty());
        assert_eq!(f.store.load().unwrap().next_threshold_seconds, 60);
    }

    #[tokio::test]
    async fn test_day_rollover_discards_open_session() {
        let mut f = fixture(60);

        f.tracker.handle_event(TrackerEvent::BecameActive).unwrap();
        f.clock.advance_secs(200);
        fire_timer(&mut f);
        assert!(!f.notifier.calls.lock().is_empty());

        // Midnight passes while the session is still open.
        f.clock.next_day();
        f.tracker.handle_event(TrackerEvent::BecameInactive).unwrap();

        let record = f.store.load().unwrap();
        assert_eq!(record.day, f.clock.today());
        assert_eq!(record.accum_ms, 0);
        assert_eq!(record.session_start, None);
        assert_eq!(record.next_threshold_seconds, 60);
        assert_eq!(record.last_notified_seconds, 0);
    }

    #[tokio::test]
    async fn test_rollover_is_idempotent() {
        let mut f = fixture(60);

        f.clock.next_day();
        f.tracker.handle_event(TrackerEvent::BecameActive).unwrap();
        let after_first = f.store.load().unwrap();

        // Same day again: a second event must not reset the open session.
        f.clock.advance_secs(30);
        f.tracker.handle_event(TrackerEvent::BecameActive).unwrap();
        assert_eq!(f.store.load().unwrap().session_start, after_first.session_start);
    }

    #[tokio::test]
    async fn test_interval_change_realigns_threshold() {
        let mut f = fixture(60);

        let mut record = f.store.load().unwrap();
        record.accum_ms = 125_000;
        record.next_threshold_seconds = 180;
        record.last_notified_seconds = 120;
        f.store.commit(&record).unwrap();

        f.tracker.handle_event(TrackerEvent::IntervalChanged(30)).unwrap();

        let record = f.store.load().unwrap();
        assert_eq!(record.interval_seconds, 30);
        // Smallest multiple of 30 at or above 125 seconds of usage.
        assert_eq!(record.next_threshold_seconds, 150);
    }

    #[tokio::test]
    async fn test_realignment_skips_already_notified_boundary() {
        let mut f = fixture(30);

        let mut record = f.store.load().unwrap();
        record.accum_ms = 120_000;
        record.next_threshold_seconds = 150;
        record.last_notified_seconds = 120;
        f.store.commit(&record).unwrap();

        // 120 is an exact multiple of the new interval but already fired.
        f.tracker.handle_event(TrackerEvent::IntervalChanged(60)).unwrap();

        assert_eq!(f.store.load().unwrap().next_threshold_seconds, 180);
    }

    #[tokio::test]
    async fn test_interval_change_rejects_non_positive() {
        let mut f = fixture(60);

        assert!(f.tracker.handle_event(TrackerEvent::IntervalChanged(0)).is_err());
        assert!(f.tracker.handle_event(TrackerEvent::IntervalChanged(-5)).is_err());
        assert_eq!(f.store.load().unwrap().interval_seconds, 60);
    }

    #[tokio::test]
    async fn test_start_sets_running_flag_and_evaluates_device() {
        let mut f = fixture(60);

        f.device.set_active(true);
        f.tracker.start().unwrap();

        let record = f.store.load().unwrap();
        assert!(record.service_running);
        assert!(record.session_start.is_some());
        assert!(f.tracker.has_pending_timer());

        // Starting again is a no-op for the open session.
        let session_start = record.session_start;
        f.clock.advance_secs(5);
        f.tracker.start().unwrap();
        assert_eq!(f.store.load().unwrap().session_start, session_start);
    }

    #[tokio::test]
    async fn test_start_with_inactive_device_opens_nothing() {
        let mut f = fixture(60);

        f.tracker.start().unwrap();

        let record = f.store.load().unwrap();
        assert!(record.service_running);
        assert_eq!(record.session_start, None);
        assert!(!f.tracker.has_pending_timer());
    }

    #[tokio::test]
    async fn test_stop_preserves_open_session() {
        let mut f = fixture(60);

        f.device.set_active(true);
        f.tracker.start().unwrap();
        f.tracker.stop().unwrap();

        let record = f.store.load().unwrap();
        assert!(!record.service_running);
        // The open session survives; the next start resumes counting it.
        assert!(record.session_start.is_some());
        assert!(!f.tracker.has_pending_timer());

        f.tracker.stop().unwrap();
        assert!(!f.store.load().unwrap().service_running);
    }

    #[tokio::test]
    async fn test_start_backfills_untouched_record() {
        let mut f = fixture(60);

        // One closed minute of usage recorded earlier today.
        let midnight = f.clock.start_of_day_ms();
        f.log.record(EventKind::InteractiveStart, midnight + 1_000).unwrap();
        f.log.record(EventKind::InteractiveEnd, midnight + 61_000).unwrap();

        f.tracker.start().unwrap();

        let record = f.store.load().unwrap();
        assert_eq!(record.accum_ms, 60_000);
        // 60 seconds rebuilt, boundary 60 not yet notified.
        assert_eq!(record.next_threshold_seconds, 60);
    }

    #[tokio::test]
    async fn test_backfill_skipped_when_record_has_progress() {
        let mut f = fixture(60);

        let mut record = f.store.load().unwrap();
        record.accum_ms = 5_000;
        f.store.commit(&record).unwrap();

        let midnight = f.clock.start_of_day_ms();
        f.log.record(EventKind::InteractiveStart, midnight + 1_000).unwrap();
        f.log.record(EventKind::InteractiveEnd, midnight + 121_000).unwrap();

        f.tracker.start().unwrap();

        // Existing progress wins; the log is not replayed over it.
        assert_eq!(f.store.load().unwrap().accum_ms, 5_000);
    }

    #[tokio::test]
    async fn test_first_minute_scenario() {
        let mut f = fixture(60);

        f.tracker.handle_event(TrackerEvent::BecameActive).unwrap();

        f.clock.advance_secs(65);
        fire_timer(&mut f);
        assert_eq!(*f.notifier.calls.lock(), vec![1]);
        assert_eq!(f.store.load().unwrap().next_threshold_seconds, 120);

        f.clock.advance_secs(5);
        f.tracker.handle_event(TrackerEvent::BecameInactive).unwrap();

        let record = f.store.load().unwrap();
        assert_eq!(record.accum_ms, 70_000);
        assert_eq!(record.session_start, None);
        assert!(!f.tracker.has_pending_timer());
    }

    #[tokio::test]
    async fn test_run_loop_shuts_down_cleanly() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let clock = Arc::new(MockClock::new(day, 1_000_000_000));
        let store = Arc::new(MemoryCounterStore::new(day, 60));
        let log = Arc::new(MemoryEventLog::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let device = Arc::new(ManualDeviceSource::new(false));
        let (tx, rx) = mpsc::channel(16);

        let mut tracker = Tracker::new(
            store.clone(),
            log.clone(),
            notifier,
            clock.clone(),
            device,
            tx.clone(),
        );
        tracker.start().unwrap();

        tx.send(TrackerEvent::BecameActive).await.unwrap();
        tx.send(TrackerEvent::Shutdown).await.unwrap();
        tracker.run(rx).await.unwrap();

        let record = store.load().unwrap();
        assert!(!record.service_running);
        assert!(record.session_start.is_some());
    }
}
