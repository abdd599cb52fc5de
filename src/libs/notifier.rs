//! Reminder delivery boundary.
//!
//! The engine emits one call per crossed threshold, in increasing order.
//! Rendering is the collaborator's concern; the shipped implementation just
//! writes through the message system, which routes to tracing when the
//! watcher runs with logging enabled.

use crate::libs::messages::Message;
use crate::msg_info;

pub trait Notifier: Send + Sync {
    /// Called once per crossed threshold with cumulative minutes for today.
    fn notify(&self, total_minutes: i64);
}

/// Console-backed reminder output.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, total_minutes: i64) {
        msg_info!(Message::UsageReminder(total_minutes));
    }
}
