//! Console configuration
//!
//! Loaded from a TOML file; every missing section or field falls back to its
//! default.

use crate::control::types::SectorScheme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Emission periods outside this range either flood the server or let the
/// robot coast between commands
pub const EMISSION_PERIOD_RANGE_MS: std::ops::RangeInclusive<u64> = 30..=100;

/// Longest knob return animation; the spring is replayed per drawn frame
pub const MAX_RETURN_DURATION_MS: u64 = 1_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub joystick: JoystickConfig,
    #[serde(default)]
    pub status: StatusConfig,
}

/// Robot server connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_ms: 2_000,
        }
    }
}

/// Joystick geometry and emission cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoystickConfig {
    /// Knob radius in pixels; the clamp radius is the base radius minus this
    pub knob_radius: f64,
    /// Fraction of the clamp radius treated as no input
    pub dead_zone: f64,
    pub emission_period_ms: u64,
    /// Pointer samples closer together than this are dropped
    pub min_update_interval_ms: u64,
    /// Upper bound on the cosmetic knob return animation
    pub return_duration_ms: u64,
    pub sectors: SectorScheme,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            knob_radius: 40.0,
            dead_zone: 0.15,
            emission_period_ms: 100,
            min_update_interval_ms: 16,
            return_duration_ms: 300,
            sectors: SectorScheme::EightWay,
        }
    }
}

impl JoystickConfig {
    pub fn emission_period(&self) -> Duration {
        Duration::from_millis(self.emission_period_ms)
    }

    pub fn min_update_interval(&self) -> Duration {
        Duration::from_millis(self.min_update_interval_ms)
    }

    pub fn return_duration(&self) -> Duration {
        Duration::from_millis(self.return_duration_ms.min(MAX_RETURN_DURATION_MS))
    }
}

/// Status polling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    pub poll_interval_ms: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
        }
    }
}

impl StatusConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl ConsoleConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("server.base_url must not be empty".to_string()));
        }
        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_ms must be positive".to_string(),
            ));
        }

        let joystick = &self.joystick;
        if !(0.0..1.0).contains(&joystick.dead_zone) {
            return Err(ConfigError::Invalid(format!(
                "joystick.dead_zone must be in [0, 1), got {}",
                joystick.dead_zone
            )));
        }
        if !(joystick.knob_radius >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "joystick.knob_radius must be non-negative, got {}",
                joystick.knob_radius
            )));
        }
        if !EMISSION_PERIOD_RANGE_MS.contains(&joystick.emission_period_ms) {
            return Err(ConfigError::Invalid(format!(
                "joystick.emission_period_ms must be in [{}, {}], got {}",
                EMISSION_PERIOD_RANGE_MS.start(),
                EMISSION_PERIOD_RANGE_MS.end(),
                joystick.emission_period_ms
            )));
        }
        if joystick.return_duration_ms > MAX_RETURN_DURATION_MS {
            return Err(ConfigError::Invalid(format!(
                "joystick.return_duration_ms must be at most {}, got {}",
                MAX_RETURN_DURATION_MS, joystick.return_duration_ms
            )));
        }

        if self.status.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "status.poll_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise from the default location if it
    /// exists, otherwise the built-in defaults
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from("nautilus-console.toml")
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
