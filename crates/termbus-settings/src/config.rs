//! Configuration and settings management for termbus
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats, by default stored in the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - Console session behavior (prompt, history bound, progress spinner)
//! - Event bus behavior (listener fault isolation)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application directory name under the platform config directory
pub const APP_DIR_NAME: &str = "termbus";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Console session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    /// Prefix shown before each command line
    pub prompt: String,
    /// Maximum number of command/response entries kept
    pub max_history: usize,
    /// Spinner frame interval while a command runs
    pub spinner_interval_ms: u64,
    /// First progress message shown when a command starts
    pub running_message: String,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            prompt: "$".to_string(),
            max_history: 1000,
            spinner_interval_ms: 80,
            running_message: "Running...".to_string(),
        }
    }
}

/// Event bus settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusSettings {
    /// Keep delivering to remaining listeners when one panics
    pub isolate_listener_panics: bool,
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            isolate_listener_panics: true,
        }
    }
}

/// Supported config file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )
            .into()),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Console session section
    pub console: ConsoleSettings,
    /// Event bus section
    pub bus: BusSettings,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform default location, e.g. `~/.config/termbus/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| {
            ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string())
        })?;
        Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load and validate a `.json` or `.toml` file
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate and write to a `.json` or `.toml` file, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = Format::from_path(path)?;

        let content = match format {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
            })?;
        }
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn validate(&self) -> SettingsResult<()> {
        if self.console.max_history == 0 {
            return Err(SettingsError::invalid("console.max_history", "must be > 0"));
        }

        if self.console.spinner_interval_ms == 0 {
            return Err(SettingsError::invalid(
                "console.spinner_interval_ms",
                "must be > 0",
            ));
        }

        if self.console.prompt.contains('\n') {
            return Err(SettingsError::invalid(
                "console.prompt",
                "must be a single line",
            ));
        }

        Ok(())
    }
}
