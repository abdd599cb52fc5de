//! Persistent log of device interactivity transitions.
//!
//! The watcher appends an event for every effective edge it observes; the
//! backfill reconciler replays today's slice after an unclean stop. Old
//! rows are pruned at service start so the table stays bounded to recent
//! history.

use crate::db::db::Db;
use crate::libs::backfill::{EventKind, UsageEvent, UsageEventLog};
use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::{params, Connection};

const SCHEMA_EVENTS: &str = "CREATE TABLE IF NOT EXISTS usage_events (
    id INTEGER NOT NULL PRIMARY KEY,
    timestamp INTEGER NOT NULL,
    kind TEXT NOT NULL
);";
const INSERT_EVENT: &str = "INSERT INTO usage_events (timestamp, kind) VALUES (?1, ?2)";
const SELECT_RANGE: &str = "SELECT timestamp, kind FROM usage_events WHERE timestamp >= ?1 AND timestamp <= ?2 ORDER BY timestamp";
const DELETE_BEFORE: &str = "DELETE FROM usage_events WHERE timestamp < ?1";

const KIND_START: &str = "interactive_start";
const KIND_END: &str = "interactive_end";

fn kind_as_str(kind: EventKind) -> &'static str {
    match kind {
        EventKind::InteractiveStart => KIND_START,
        EventKind::InteractiveEnd => KIND_END,
    }
}

pub struct Events {
    conn: Mutex<Connection>,
}

impl Events {
    pub fn new() -> Result<Events> {
        let db = Db::new()?;
        db.conn.execute(SCHEMA_EVENTS, [])?;
        Ok(Events { conn: Mutex::new(db.conn) })
    }

    /// Drops events older than the given timestamp. Only today's slice is
    /// ever replayed, so anything before the previous midnight is noise.
    pub fn prune_before(&self, timestamp_ms: i64) -> Result<usize> {
        let conn = self.conn.lock();
        let removed = conn.execute(DELETE_BEFORE, params![timestamp_ms])?;
        Ok(removed)
    }
}

impl UsageEventLog for Events {
    fn record(&self, kind: EventKind, timestamp_ms: i64) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(INSERT_EVENT, params![timestamp_ms, kind_as_str(kind)])?;
        Ok(())
    }

    fn query(&self, from_ms: i64, to_ms: i64) -> Result<Vec<UsageEvent>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_RANGE)?;
        let event_iter = stmt.query_map(params![from_ms, to_ms], |row| {
            let kind: String = row.get(1)?;
            Ok(UsageEvent {
                timestamp_ms: row.get(0)?,
                kind: if kind == KIND_START {
                    EventKind::InteractiveStart
                } else {
                    EventKind::InteractiveEnd
                },
            })
        })?;

        let mut events = Vec::new();
        for event in event_iter {
            events.push(event?);
        }
        Ok(events)
    }
}
