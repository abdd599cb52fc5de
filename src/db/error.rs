use thiserror::Error;

/// Storage-layer errors.
///
/// A failed read or write aborts the current operation only; the tracking
/// loop logs it and retries on the next event instead of crashing.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("data directory unavailable: {0}")]
    DataDir(String),
}
