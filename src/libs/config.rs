//! Configuration management for the lumen application.
//!
//! Settings are stored as JSON in the platform data directory and cover the
//! tracker's defaults: the reminder cadence a fresh counter starts with and
//! the input-monitoring knobs. The authoritative interval for the current day
//! lives in the persistent counter record (it can be edited at runtime via
//! `lumen interval`); the value here only seeds fresh records.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lumen::libs::config::Config;
//!
//! let config = Config::read()?;
//! let tracker = config.tracker.unwrap_or_default();
//! # anyhow::Ok(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Usage tracker configuration settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrackerConfig {
    /// Default reminder cadence in seconds for a fresh day.
    ///
    /// Only consulted when the counter record is created; runtime edits go
    /// through the counter store so a running watcher realigns correctly.
    pub interval_seconds: i64,

    /// Poll interval in milliseconds for checking input activity.
    pub poll_interval: u64,

    /// Seconds without keyboard or mouse input before the device is
    /// classified as inactive and the open session is closed.
    pub activity_threshold: u64,
}

/// Main configuration container.
///
/// Every section is optional so missing configuration never breaks the
/// application; absent sections fall back to defaults.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    /// Usage tracking and reminder settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<TrackerConfig>,
}

impl Default for TrackerConfig {
    /// Defaults: a reminder every 5 minutes, activity polled twice a second,
    /// 30 seconds of silence before a session closes.
    fn default() -> Self {
        TrackerConfig {
            interval_seconds: 300,
            poll_interval: 500,
            activity_threshold: 30,
        }
    }
}

impl Config {
    /// Reads configuration from the filesystem, falling back to defaults
    /// when no file exists.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Saves the current configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file if present.
    pub fn delete() -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if config_file_path.exists() {
            fs::remove_file(config_file_path)?;
        }
        Ok(())
    }

    /// Runs the interactive configuration setup.
    ///
    /// Pre-fills existing values as defaults so re-running the wizard only
    /// changes what the user edits.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let default = config.tracker.clone().unwrap_or_default();

        msg_print!(Message::ConfigModuleTracker);
        config.tracker = Some(TrackerConfig {
            interval_seconds: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptIntervalSeconds.to_string())
                .default(default.interval_seconds)
                .interact_text()?,

            poll_interval: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptPollInterval.to_string())
                .default(default.poll_interval)
                .interact_text()?,

            activity_threshold: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptActivityThreshold.to_string())
                .default(default.activity_threshold)
                .interact_text()?,
        });

        Ok(config)
    }
}
