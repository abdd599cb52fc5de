//! Activity watcher command.
//!
//! By default the watcher detaches into the background; `--foreground` keeps
//! it attached to the terminal (useful for debugging with `LUMEN_DEBUG=1`),
//! and `--stop` terminates a running watcher.

use crate::libs::daemon;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Run attached to the current terminal instead of detaching
    #[arg(short, long)]
    foreground: bool,

    /// Stop the running watcher
    #[arg(short, long)]
    stop: bool,
}

pub async fn cmd(args: WatchArgs) -> Result<()> {
    if args.stop {
        return daemon::stop();
    }

    if args.foreground {
        return daemon::run_with_signal_handling().await;
    }

    daemon::spawn()
}
