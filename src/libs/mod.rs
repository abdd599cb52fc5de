pub mod backfill;
pub mod clock;
pub mod config;
pub mod counter;
pub mod daemon;
pub mod data_storage;
pub mod device;
pub mod formatter;
pub mod messages;
pub mod notifier;
pub mod tracker;
pub mod view;
