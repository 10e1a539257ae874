use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::notify::SerialSettings;
use crate::predict::{Observer, DEFAULT_URL};
use crate::proximity::{Band, ThresholdError, ThresholdTable};

pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -80.0..=80.0;
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;
pub const ALTITUDE_RANGE: std::ops::RangeInclusive<i64> = 0..=10_000;
pub const PASSES_RANGE: std::ops::RangeInclusive<i64> = 1..=100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("You must specify both a latitude and a longitude")]
    MissingLocation,
    #[error("Latitude must be between -80.0 and 80.0 degrees, got {0}")]
    Latitude(f64),
    #[error("Longitude must be between -180.0 and 180.0 degrees, got {0}")]
    Longitude(f64),
    #[error("Altitude must be between 0 and 10,000 metres, got {0}")]
    Altitude(i64),
    #[error("Passes must be between 1 and 100, got {0}")]
    Passes(i64),
    #[error("Invalid threshold table: {0}")]
    Thresholds(#[from] ThresholdError),
}

/// Contents of the optional YAML configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub observer: Option<Observer>,
    pub passes: Option<i64>,
    #[serde(default)]
    pub api: ApiConfig,
    pub serial: Option<SerialSettings>,
    #[serde(default)]
    pub polling: PollingConfig,
    pub thresholds: Option<Vec<Band>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PollingConfig {
    /// Wait after a failed, empty or inconsistent fetch
    #[serde(
        default = "default_recovery_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub recovery_interval: Duration,
    /// Wait when the very first pass seen has already started
    #[serde(
        default = "default_overhead_fallback",
        deserialize_with = "deserialize_duration"
    )]
    pub overhead_fallback: Duration,
    #[serde(
        default = "default_self_test_pause",
        deserialize_with = "deserialize_duration"
    )]
    pub self_test_pause: Duration,
    /// Give up after this many fetch errors in a row. Retries forever if unset.
    #[serde(default)]
    pub max_consecutive_failures: Option<u32>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            recovery_interval: default_recovery_interval(),
            overhead_fallback: default_overhead_fallback(),
            self_test_pause: default_self_test_pause(),
            max_consecutive_failures: None,
        }
    }
}

fn default_recovery_interval() -> Duration {
    Duration::from_secs(10)
}

fn default_overhead_fallback() -> Duration {
    Duration::from_secs(600)
}

fn default_self_test_pause() -> Duration {
    Duration::from_secs(5)
}

/// Values given on the command line, which take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude_m: Option<i64>,
    pub passes: Option<i64>,
    pub serial_device: Option<String>,
}

/// Validated settings for one watch run
#[derive(Debug, Clone)]
pub struct Settings {
    pub observer: Observer,
    pub passes: u32,
    pub api: ApiConfig,
    pub serial: Option<SerialSettings>,
    pub polling: PollingConfig,
    pub thresholds: ThresholdTable,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Merge command line overrides and check every value is usable.
    pub fn resolve(self, overrides: Overrides) -> Result<Settings, ConfigError> {
        let file_observer = self.observer;

        let latitude = overrides
            .latitude
            .or(file_observer.map(|o| o.latitude))
            .ok_or(ConfigError::MissingLocation)?;
        let longitude = overrides
            .longitude
            .or(file_observer.map(|o| o.longitude))
            .ok_or(ConfigError::MissingLocation)?;
        let altitude_m = overrides
            .altitude_m
            .or(file_observer.map(|o| o.altitude_m))
            .unwrap_or(1);
        let passes = overrides.passes.or(self.passes).unwrap_or(1);

        if !LATITUDE_RANGE.contains(&latitude) {
            return Err(ConfigError::Latitude(latitude));
        }
        if !LONGITUDE_RANGE.contains(&longitude) {
            return Err(ConfigError::Longitude(longitude));
        }
        if !ALTITUDE_RANGE.contains(&altitude_m) {
            return Err(ConfigError::Altitude(altitude_m));
        }
        if !PASSES_RANGE.contains(&passes) {
            return Err(ConfigError::Passes(passes));
        }

        let serial = match (overrides.serial_device, self.serial) {
            (Some(device), Some(file)) => Some(SerialSettings { device, ..file }),
            (Some(device), None) => Some(SerialSettings::new(device)),
            (None, file) => file,
        };

        let thresholds = match self.thresholds {
            Some(bands) => ThresholdTable::new(bands)?,
            None => ThresholdTable::default(),
        };

        Ok(Settings {
            observer: Observer {
                latitude,
                longitude,
                altitude_m,
            },
            passes: passes as u32,
            api: self.api,
            serial,
            polling: self.polling,
            thresholds,
        })
    }
}

pub(crate) fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}
