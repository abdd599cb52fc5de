pub mod init;
pub mod interval;
pub mod status;
pub mod watch;

use crate::libs::daemon;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Watch device activity and remind about screen time")]
    Watch(watch::WatchArgs),
    #[command(about = "Show today's screen time")]
    Status,
    #[command(about = "Show or change the reminder interval")]
    Interval(interval::IntervalArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        // The detached daemon re-executes this binary with a private flag
        // that must not surface in the user-facing CLI.
        if std::env::args().any(|arg| arg == "--daemon-run") {
            return daemon::run_with_signal_handling().await;
        }

        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Watch(args) => watch::cmd(args).await,
            Commands::Status => status::cmd(),
            Commands::Interval(args) => interval::cmd(args),
        }
    }
}
