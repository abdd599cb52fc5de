//! # Lumen - Daily Screen-Time Accounting and Reminders
//!
//! A command-line utility that measures how long the machine has been in
//! active use since local midnight and raises a reminder each time the
//! cumulative total crosses a configurable interval.
//!
//! ## Features
//!
//! - **Usage Tracking**: Active sessions detected from keyboard and mouse input
//! - **Threshold Reminders**: One reminder per crossed interval boundary, drift-corrected
//! - **Durable Counters**: Accumulated time survives restarts and day boundaries
//! - **Backfill**: Cold starts reconstruct today's total from the transition log
//! - **Background Watcher**: Detached daemon with graceful shutdown
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lumen::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
