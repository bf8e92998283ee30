//! termbus Settings Crate
//!
//! Handles application configuration and its persistence.

pub mod config;
pub mod error;

pub use config::{BusSettings, Config, ConsoleSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
