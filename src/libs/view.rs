//! Console table rendering for the status command.

use crate::libs::counter::UsageRecord;
use crate::libs::formatter::format_millis;
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    /// Renders today's usage snapshot as a table on stdout.
    ///
    /// `total_ms` is passed in separately because an open session's share
    /// is computed against the current time, not stored in the record.
    pub fn status(record: &UsageRecord, total_ms: i64) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["DAY", record.day.format("%Y-%m-%d")]);
        table.add_row(row!["SCREEN TIME", format_millis(total_ms)]);
        table.add_row(row![
            "SESSION",
            if record.session_start.is_some() { "active" } else { "idle" }
        ]);
        table.add_row(row![
            "NEXT REMINDER AT",
            format_millis(record.next_threshold_seconds * 1000)
        ]);
        table.add_row(row![
            "REMINDER INTERVAL",
            format_millis(record.interval_seconds * 1000)
        ]);
        table.add_row(row![
            "WATCHER",
            if record.service_running { "running" } else { "stopped" }
        ]);
        table.printstd();

        Ok(())
    }
}
