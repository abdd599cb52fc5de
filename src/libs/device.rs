//! Device-state classification and edge detection.
//!
//! The tracking engine only cares about two things: whether the device is in
//! active use right now, and the moments that classification flips. On a
//! desktop "active use" means recent keyboard or mouse input, so the shipped
//! source listens for input events on a dedicated thread and a poll task
//! turns the recency check into `BecameActive` / `BecameInactive` edges on
//! the engine's control channel.

use crate::libs::config::TrackerConfig;
use crate::libs::tracker::TrackerEvent;
use crate::msg_debug;
use parking_lot::Mutex;
use rdev::{listen, Event, EventType};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;

/// On-demand device-state classification.
pub trait DeviceStateSource: Send + Sync {
    fn is_active(&self) -> bool;
}

/// Input-recency based device state.
///
/// A background thread keeps `last_activity` fresh from rdev events; the
/// listener is restarted on error so monitoring survives transient failures.
pub struct InputActivitySource {
    last_activity: Arc<Mutex<Instant>>,
    activity_threshold: Duration,
    poll_interval: Duration,
}

impl InputActivitySource {
    pub fn new(config: &TrackerConfig) -> Self {
        let last_activity = Arc::new(Mutex::new(Instant::now()));

        let shared_last_activity = last_activity.clone();
        std::thread::spawn(move || loop {
            let listener_activity = shared_last_activity.clone();
            if let Err(e) = listen(move |event: Event| match event.event_type {
                EventType::KeyPress(_) | EventType::ButtonPress(_) | EventType::Wheel { .. } => {
                    *listener_activity.lock() = Instant::now();
                }
                _ => {}
            }) {
                msg_debug!("input listener failed: {:?}, retrying in 1 second", e);
                std::thread::sleep(Duration::from_secs(1));
            } else {
                break;
            }
        });

        InputActivitySource {
            last_activity,
            activity_threshold: Duration::from_secs(config.activity_threshold),
            poll_interval: Duration::from_millis(config.poll_interval),
        }
    }

    /// Spawns the poll task that feeds activity edges into the engine's
    /// control channel. Aborting the returned handle deregisters the
    /// subscription.
    pub fn subscribe(&self, tx: mpsc::Sender<TrackerEvent>) -> JoinHandle<()> {
        let last_activity = self.last_activity.clone();
        let threshold = self.activity_threshold;
        let poll_interval = self.poll_interval;

        tokio::spawn(async move {
            let mut was_active = last_activity.lock().elapsed() < threshold;
            loop {
                time::sleep(poll_interval).await;
                let active = last_activity.lock().elapsed() < threshold;
                if active != was_active {
                    let event = if active { TrackerEvent::BecameActive } else { TrackerEvent::BecameInactive };
                    if tx.send(event).await.is_err() {
                        break; // engine gone
                    }
                    was_active = active;
                }
            }
        })
    }
}

impl DeviceStateSource for InputActivitySource {
    fn is_active(&self) -> bool {
        self.last_activity.lock().elapsed() < self.activity_threshold
    }
}

/// Manually switched device state, used by tests and embedders that supply
/// their own edge events.
#[derive(Default)]
pub struct ManualDeviceSource {
    active: AtomicBool,
}

impl ManualDeviceSource {
    pub fn new(active: bool) -> Self {
        ManualDeviceSource { active: AtomicBool::new(active) }
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }
}

impl DeviceStateSource for ManualDeviceSource {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
