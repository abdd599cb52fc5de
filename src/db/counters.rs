//! Durable storage for the daily usage counter.
//!
//! The counter is a single logical record, kept as one row with a fixed id
//! so every commit is a single upsert statement. That makes each commit
//! atomic on its own: a concurrent reader (the `status` command) either sees
//! the previous record or the new one, never a mix of fields.

use crate::db::db::Db;
use crate::libs::counter::{CounterStore, UsageRecord};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

const SCHEMA_COUNTER: &str = "CREATE TABLE IF NOT EXISTS usage_counter (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    day DATE NOT NULL,
    accum_ms INTEGER NOT NULL,
    session_start INTEGER,
    next_threshold_seconds INTEGER NOT NULL,
    interval_seconds INTEGER NOT NULL,
    service_running INTEGER NOT NULL,
    last_notified_seconds INTEGER NOT NULL
);";

const UPSERT_COUNTER: &str = "INSERT INTO usage_counter
    (id, day, accum_ms, session_start, next_threshold_seconds, interval_seconds, service_running, last_notified_seconds)
    VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT(id) DO UPDATE SET
        day = ?1,
        accum_ms = ?2,
        session_start = ?3,
        next_threshold_seconds = ?4,
        interval_seconds = ?5,
        service_running = ?6,
        last_notified_seconds = ?7";

const SELECT_COUNTER: &str = "SELECT day, accum_ms, session_start, next_threshold_seconds, interval_seconds, service_running, last_notified_seconds
    FROM usage_counter WHERE id = 1";

pub struct Counters {
    conn: Mutex<Connection>,
    /// Interval seeded into a fresh record when no row exists yet.
    default_interval_seconds: i64,
}

impl Counters {
    pub fn new(default_interval_seconds: i64) -> Result<Self> {
        let db = Db::new()?;
        db.conn.execute(SCHEMA_COUNTER, [])?;
        Ok(Counters {
            conn: Mutex::new(db.conn),
            default_interval_seconds,
        })
    }
}

impl CounterStore for Counters {
    fn load(&self) -> Result<UsageRecord> {
        let conn = self.conn.lock();
        let record = conn
            .query_row(SELECT_COUNTER, [], |row| {
                Ok(UsageRecord {
                    day: row.get::<_, NaiveDate>(0)?,
                    accum_ms: row.get(1)?,
                    session_start: row.get(2)?,
                    next_threshold_seconds: row.get(3)?,
                    interval_seconds: row.get(4)?,
                    service_running: row.get(5)?,
                    last_notified_seconds: row.get(6)?,
                })
            })
            .optional()?;

        Ok(record.unwrap_or_else(|| UsageRecord::fresh(Local::now().date_naive(), self.default_interval_seconds)))
    }

    fn commit(&self, record: &UsageRecord) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            UPSERT_COUNTER,
            params![
                record.day,
                record.accum_ms,
                record.session_start,
                record.next_threshold_seconds,
                record.interval_seconds,
                record.service_running,
                record.last_notified_seconds,
            ],
        )?;
        Ok(())
    }
}
