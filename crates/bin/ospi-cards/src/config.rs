//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `ospi.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use chrono::FixedOffset;
use serde::Deserialize;

use ospi_domain::card::{StationCardConfig, SystemCardConfig};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// The simulated controller.
    pub controller: ControllerConfig,
    /// How times are shown.
    pub display: DisplayConfig,
    /// Station card as the dashboard would configure it (camelCase keys).
    pub station_card: Option<StationCardConfig>,
    /// System card as the dashboard would configure it (camelCase keys).
    pub system_card: Option<SystemCardConfig>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Device id the controller's entities are registered under.
    pub device: String,
    /// Station names, in controller order.
    pub stations: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Offset from UTC used for "last run" times.
    pub utc_offset_minutes: i32,
}

impl Config {
    /// Load configuration from `ospi.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("ospi.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("OSPI_DEVICE") {
            self.controller.device = val;
        }
        if let Ok(val) = std::env::var("OSPI_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.controller.device.is_empty() {
            return Err(ConfigError::Validation(
                "controller device must not be empty".to_string(),
            ));
        }
        if self.controller.stations.is_empty() {
            return Err(ConfigError::Validation(
                "at least one station is required".to_string(),
            ));
        }
        self.display.offset()?;
        Ok(())
    }
}

impl DisplayConfig {
    /// The configured offset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for offsets of a day or more.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "utc_offset_minutes out of range: {}",
                    self.utc_offset_minutes
                ))
            })
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "ospi_cards=info,ospi=info".to_string(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            device: "opensprinkler".to_string(),
            stations: vec!["Front Lawn".to_string(), "Back Yard".to_string()],
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
