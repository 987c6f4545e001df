use crate::reader::read_number;
use crate::supply::PowerSupply;
use power_config::SensorConfig;
use power_core::{Ampere, Result, Sample, Volt, Watt};
use std::path::PathBuf;

/// Anything that can produce a fresh [`Sample`] on demand.
///
/// The watcher samples through this trait so it can run against sysfs or a
/// scripted source in tests.
pub trait SampleSource: Send + Sync + 'static {
    fn sample(&self) -> Result<Sample>;
}

/// The pair of attribute files a sample is composed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorSources {
    pub current: PathBuf,
    pub voltage: PathBuf,
}

impl SensorSources {
    pub fn new(current: impl Into<PathBuf>, voltage: impl Into<PathBuf>) -> Self {
        Self {
            current: current.into(),
            voltage: voltage.into(),
        }
    }

    pub fn from_supply(supply: &PowerSupply) -> Self {
        Self::new(supply.current_path(), supply.voltage_path())
    }

    /// Resolve sources from config: explicit paths first, then the named
    /// supply, then the first battery found in sysfs.
    pub fn from_config(config: &SensorConfig) -> Result<Self> {
        if let (Some(current), Some(voltage)) = (&config.current, &config.voltage) {
            return Ok(Self::new(current, voltage));
        }

        let supply = match &config.supply {
            Some(name) => PowerSupply::new(name),
            None => PowerSupply::discover()?,
        };
        tracing::debug!("Using power supply at '{}'", supply.dir().display());

        Ok(Self::new(
            config.current.clone().unwrap_or_else(|| supply.current_path()),
            config.voltage.clone().unwrap_or_else(|| supply.voltage_path()),
        ))
    }

    /// Instant current drawn by the system.
    pub fn current_now(&self) -> Result<Ampere> {
        read_number(&self.current).map(Ampere)
    }

    /// Instant voltage of the supply.
    pub fn voltage_now(&self) -> Result<Volt> {
        read_number(&self.voltage).map(Volt)
    }

    /// Read current, then voltage, and stamp the result once both succeeded.
    /// Voltage is not read when the current read fails.
    pub fn sample_now(&self) -> Result<Sample> {
        let current = self.current_now()?;
        let voltage = self.voltage_now()?;
        Ok(Sample::now(current, voltage))
    }

    /// Instant power, derived from a full sample.
    pub fn power_now(&self) -> Result<Watt> {
        self.sample_now().map(|s| s.power)
    }
}

impl SampleSource for SensorSources {
    fn sample(&self) -> Result<Sample> {
        self.sample_now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use power_core::PowerError;
    use std::time::Instant;
    use tempfile::TempDir;

    fn fake_supply(current: &str, voltage: &str) -> (TempDir, PowerSupply) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("current_now"), current).unwrap();
        std::fs::write(dir.path().join("voltage_now"), voltage).unwrap();
        let supply = PowerSupply::at(dir.path());
        (dir, supply)
    }

    #[test]
    fn sample_derives_power() {
        let (_dir, supply) = fake_supply("1500000\n", "12000000\n");
        let sources = SensorSources::from_supply(&supply);

        let before = Utc::now();
        let started = Instant::now();
        let sample = sources.sample_now().unwrap();

        assert_eq!(sample.current, Ampere(1_500_000.0));
        assert_eq!(sample.voltage, Volt(12_000_000.0));
        assert_eq!(sample.power, Watt(18_000_000.0));
        assert!(sample.instant >= before);
        assert!(sample.monotonic >= started);
    }

    #[test]
    fn current_failure_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let sources = SensorSources::new(dir.path().join("current_now"), dir.path().join("voltage_now"));

        match sources.sample_now().unwrap_err() {
            PowerError::SourceUnavailable { path, .. } => assert_eq!(path, sources.current),
            other => panic!("wrong error: {other}"),
        }
    }

    #[test]
    fn voltage_failure_is_reported() {
        let (_dir, supply) = fake_supply("1000\n", "n/a\n");
        let sources = SensorSources::from_supply(&supply);
        assert!(matches!(
            sources.power_now(),
            Err(PowerError::MalformedValue { .. })
        ));
    }

    #[test]
    fn one_shot_readers() {
        let (_dir, supply) = fake_supply("2000", "3000000");
        let sources = SensorSources::from_supply(&supply);
        assert_eq!(sources.current_now().unwrap(), Ampere(2000.0));
        assert_eq!(sources.voltage_now().unwrap(), Volt(3_000_000.0));
        assert_eq!(sources.power_now().unwrap(), Watt(6000.0));
    }

    #[test]
    fn config_paths_override_supply() {
        let config = SensorConfig {
            supply:  Some("BAT7".into()),
            current: Some(PathBuf::from("/tmp/i")),
            voltage: None,
        };
        let sources = SensorSources::from_config(&config).unwrap();
        assert_eq!(sources.current, PathBuf::from("/tmp/i"));
        assert_eq!(
            sources.voltage,
            PathBuf::from("/sys/class/power_supply/BAT7/voltage_now")
        );
    }

    #[test]
    fn config_with_both_paths_skips_discovery() {
        let config = SensorConfig {
            supply:  None,
            current: Some(PathBuf::from("/tmp/i")),
            voltage: Some(PathBuf::from("/tmp/v")),
        };
        assert_eq!(
            SensorSources::from_config(&config).unwrap(),
            SensorSources::new("/tmp/i", "/tmp/v")
        );
    }
}
