//! Configuration for pitbox.
//!
//! Loaded via figment from (in order of precedence, highest first):
//! environment variables prefixed with `PITBOX_`, a TOML file at
//! `~/.config/pitbox/config.toml`, then built-in defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "pitbox";

/// Default dyno data file name.
const DYNO_FILE_NAME: &str = "dyno.json";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sensor tap link configuration.
    pub link: LinkConfig,
    /// Recording session configuration.
    pub session: SessionConfig,
    /// Dyno sheet configuration.
    pub dyno: DynoConfig,
}

/// Sensor tap link configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Serial device of the ESP32 tap harness.
    pub device: PathBuf,
    /// Line speed the harness is flashed for. Informational: the port is
    /// expected to be configured externally (e.g. `stty -F <dev> 115200 raw`).
    pub baud: u32,
    /// Interval between sensor polls in milliseconds.
    pub poll_interval_ms: u64,
    /// Settle time after opening the device, in milliseconds (the ESP32
    /// reboots when the port opens).
    pub boot_delay_ms: u64,
}

/// Recording session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory for session CSV files.
    /// Defaults to `~/.local/share/pitbox/`.
    pub output_dir: Option<PathBuf>,
    /// Session length in minutes when not given on the command line.
    pub default_minutes: u64,
}

/// Dyno sheet configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynoConfig {
    /// Path of the tuned-curve JSON file.
    /// Defaults to `~/.local/share/pitbox/dyno.json`.
    pub data_path: Option<PathBuf>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from("/dev/ttyUSB0"),
            baud: 115_200,
            poll_interval_ms: 100,
            boot_delay_ms: 3_000,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            default_minutes: 10,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("PITBOX_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.link.poll_interval_ms == 0 {
            return Err(Error::config_validation(
                "link.poll_interval_ms must be greater than 0",
            ));
        }

        if self.session.default_minutes == 0 {
            return Err(Error::config_validation(
                "session.default_minutes must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Get the session output directory, resolving defaults if not set.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.session
            .output_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the dyno data path, resolving defaults if not set.
    #[must_use]
    pub fn dyno_path(&self) -> PathBuf {
        self.dyno
            .data_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DYNO_FILE_NAME))
    }

    /// Get the poll interval as a Duration.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.link.poll_interval_ms)
    }

    /// Get the boot delay as a Duration.
    #[must_use]
    pub fn boot_delay(&self) -> Duration {
        Duration::from_millis(self.link.boot_delay_ms)
    }
}

impl SessionConfig {
    /// `default_minutes` as a Duration.
    #[must_use]
    pub fn default_duration(&self) -> Duration {
        Duration::from_secs(self.default_minutes * 60)
    }
}
