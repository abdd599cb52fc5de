//! Display implementation for lumen application messages.
//!
//! All user-facing text lives here, so wording stays consistent and the rest
//! of the code deals only in typed `Message` values.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // Reminders
            Message::UsageReminder(minutes) => format!("Screen time since midnight: {} min", minutes),

            // Config
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleTracker => "Tracker configuration".to_string(),
            Message::PromptIntervalSeconds => "Reminder interval in seconds".to_string(),
            Message::PromptPollInterval => "Activity poll interval in milliseconds".to_string(),
            Message::PromptActivityThreshold => "Seconds without input before the device counts as inactive".to_string(),

            // Interval
            Message::IntervalCurrent(seconds) => format!("Current reminder interval: {} seconds", seconds),
            Message::IntervalUpdated(seconds) => format!("Reminder interval set to {} seconds", seconds),
            Message::IntervalMustBePositive => "The reminder interval must be a positive number of seconds".to_string(),
            Message::WatcherRestarting => "Restarting the watcher to apply the new interval".to_string(),

            // Watcher / daemon
            Message::WatcherStarted(pid) => format!("Watcher started in background (PID: {})", pid),
            Message::WatcherStopped(pid) => format!("Watcher stopped (PID: {})", pid),
            Message::WatcherNotRunning => "Watcher is not running".to_string(),
            Message::WatcherNotRunningPidNotFound => "Watcher is not running (PID file not found)".to_string(),
            Message::WatcherStoppingExisting(pid) => format!("Stopping existing watcher (PID: {})", pid),
            Message::WatcherFailedToStopExisting(e) => format!("Failed to stop existing watcher: {}", e),
            Message::WatcherFailedToStop(pid) => format!("Failed to stop watcher process {}", pid),
            Message::InvalidPidFileContent => "Invalid PID file content".to_string(),
            Message::WatcherReceivedSigterm => "Received SIGTERM, shutting down gracefully...".to_string(),
            Message::WatcherReceivedSigint => "Received SIGINT, shutting down gracefully...".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl+C, shutting down gracefully...".to_string(),
            Message::WatcherCtrlCListenFailed(e) => format!("Failed to listen for Ctrl+C: {}", e),
            Message::WatcherSignalHandlingNotSupported => "Signal handling is not supported on this platform".to_string(),
            Message::DaemonModeNotSupported => "Daemon mode is not supported on this platform".to_string(),
            Message::FailedToGetCurrentExecutable => "Failed to determine the current executable path".to_string(),
            Message::FailedToCreateSigtermHandler => "Failed to create SIGTERM handler".to_string(),
            Message::FailedToCreateSigintHandler => "Failed to create SIGINT handler".to_string(),
            Message::FailedToOpenProcess(code) => format!("Failed to open process (error {})", code),
            Message::FailedToTerminateProcess(code) => format!("Failed to terminate process (error {})", code),
            Message::ProcessTerminationNotSupported => "Process termination is not supported on this platform".to_string(),

            // Tracker
            Message::TrackerStarted => "Usage tracking started".to_string(),
            Message::TrackerExitedNormally => "Tracker exited normally".to_string(),
            Message::TrackerShuttingDown => "Shutting down tracker...".to_string(),
            Message::TrackerError(e) => format!("Tracker error: {}", e),
            Message::TrackerTaskPanicked(e) => format!("Tracker task panicked: {}", e),
            Message::TrackerEventFailed(e) => format!("Failed to handle tracker event: {}", e),
            Message::BackfillApplied(ms) => format!("Reconstructed {} ms of usage from today's event log", ms),
            Message::BackfillUnavailable(e) => format!("Event log unavailable, starting from zero: {}", e),

            // Storage
            Message::EventLogRecordFailed(e) => format!("Failed to record usage event: {}", e),
        };
        write!(f, "{}", text)
    }
}
