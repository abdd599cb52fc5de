#[derive(Debug, Clone)]
pub enum Message {
    // === REMINDER MESSAGES ===
    UsageReminder(i64), // total minutes since midnight

    // === CONFIG MESSAGES ===
    ConfigSaved,
    ConfigModuleTracker,
    PromptIntervalSeconds,
    PromptPollInterval,
    PromptActivityThreshold,

    // === INTERVAL MESSAGES ===
    IntervalCurrent(i64),
    IntervalUpdated(i64),
    IntervalMustBePositive,
    WatcherRestarting,

    // === WATCHER MESSAGES ===
    WatcherStarted(u32),
    WatcherStopped(u32),
    WatcherNotRunning,
    WatcherNotRunningPidNotFound,
    WatcherStoppingExisting(String),
    WatcherFailedToStopExisting(String),
    WatcherFailedToStop(u32),
    InvalidPidFileContent,
    WatcherReceivedSigterm,
    WatcherReceivedSigint,
    WatcherReceivedCtrlC,
    WatcherCtrlCListenFailed(String),
    WatcherSignalHandlingNotSupported,
    DaemonModeNotSupported,
    FailedToGetCurrentExecutable,
    FailedToCreateSigtermHandler,
    FailedToCreateSigintHandler,
    FailedToOpenProcess(u32),
    FailedToTerminateProcess(u32),
    ProcessTerminationNotSupported,

    // === TRACKER MESSAGES ===
    TrackerStarted,
    TrackerExitedNormally,
    TrackerShuttingDown,
    TrackerError(String),
    TrackerTaskPanicked(String),
    TrackerEventFailed(String),
    BackfillApplied(i64), // reconstructed milliseconds
    BackfillUnavailable(String),

    // === STORAGE MESSAGES ===
    EventLogRecordFailed(String),
}
