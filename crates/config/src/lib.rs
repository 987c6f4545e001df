pub mod schema;

pub use schema::{PowerConfig, ReportConfig, SensorConfig, WatcherConfig};

use power_core::{PowerError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `PowerConfig::default()` if
/// the file doesn't exist so the watcher always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<PowerConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(PowerConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| PowerError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config = parse(&raw)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from a TOML string.
pub fn parse(raw: &str) -> Result<PowerConfig> {
    toml::from_str(raw).map_err(|e| PowerError::Config(format!("TOML parse error: {e}")))
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("powerwatch").join("powerwatch.toml")
}

impl PowerConfig {
    /// Reject settings the watcher could not run with.
    pub fn validate(&self) -> Result<()> {
        let w = &self.watcher;
        if w.tick_interval_ms == 0 {
            return Err(PowerError::Config("watcher.tick_interval_ms must be > 0".into()));
        }
        let capacity = w.max_window_secs.saturating_mul(1000) / w.tick_interval_ms;
        if capacity < 2 {
            return Err(PowerError::Config(format!(
                "watcher.max_window_secs / tick_interval keeps only {capacity} sample(s), need at least 2"
            )));
        }
        if self.report.interval_secs == 0 {
            return Err(PowerError::Config("report.interval_secs must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, PowerConfig::default());
        assert_eq!(config.watcher.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.watcher.max_window(), Duration::from_secs(600));
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = parse(
            r#"
            [watcher]
            tick_interval_ms = 250
            log_file = "/tmp/power.csv"

            [sensor]
            supply = "BAT1"
            "#,
        )
        .unwrap();
        assert_eq!(config.watcher.tick_interval_ms, 250);
        assert_eq!(config.watcher.max_window_secs, 600);
        assert_eq!(config.watcher.log_file, Some(PathBuf::from("/tmp/power.csv")));
        assert_eq!(config.sensor.supply.as_deref(), Some("BAT1"));
        assert_eq!(config.report, ReportConfig::default());
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = parse("[watcher\n").unwrap_err();
        assert!(matches!(err, PowerError::Config(_)));
    }

    #[test]
    fn validate_rejects_tiny_window() {
        let config = parse("[watcher]\ntick_interval_ms = 5000\nmax_window_secs = 5\n").unwrap();
        assert!(matches!(config.validate(), Err(PowerError::Config(_))));
    }

    #[test]
    fn validate_rejects_zero_tick() {
        let config = parse("[watcher]\ntick_interval_ms = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, PowerConfig::default());
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[report]\nwindow_secs = 30").unwrap();
        let config = load(file.path()).unwrap();
        assert_eq!(config.report.window_secs, 30);
        assert_eq!(config.report.interval_secs, 10);
    }
}
