use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure parsed from `powerwatch.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    /// Sampling loop settings.
    pub watcher: WatcherConfig,
    /// Where current and voltage are read from.
    pub sensor: SensorConfig,
    /// Periodic report printed by `powerwatch watch`.
    pub report: ReportConfig,
}

/// Sampling loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Sampling period in milliseconds.
    pub tick_interval_ms: u64,
    /// Span of history kept in memory, in seconds.
    pub max_window_secs: u64,
    /// Append one CSV line per sample to this file.
    pub log_file: Option<PathBuf>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            max_window_secs:  600,
            log_file:         None,
        }
    }
}

impl WatcherConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn max_window(&self) -> Duration {
        Duration::from_secs(self.max_window_secs)
    }
}

/// Sensor source selection. Explicit paths win over the supply name; with
/// neither set the first battery under `/sys/class/power_supply` is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Power supply name, e.g. `"BAT0"`.
    pub supply: Option<String>,
    /// Override for the `current_now` attribute.
    pub current: Option<PathBuf>,
    /// Override for the `voltage_now` attribute.
    pub voltage: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Trailing window averaged in each report, in seconds.
    pub window_secs: u64,
    /// Seconds between two reports.
    pub interval_secs: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            window_secs:   60,
            interval_secs: 10,
        }
    }
}
