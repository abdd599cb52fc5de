pub mod counters;
pub mod db;
pub mod error;
pub mod events;
