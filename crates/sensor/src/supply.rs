use power_core::{PowerError, Result};
use std::path::{Path, PathBuf};

const SYSFS_ROOT: &str = "/sys/class/power_supply";
const BATTERIES: [&str; 3] = ["BAT0", "BAT1", "BAT2"];

/// A power supply directory exposing `current_now` and `voltage_now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerSupply {
    dir: PathBuf,
}

impl PowerSupply {
    /// Supply named `name` under `/sys/class/power_supply`.
    pub fn new(name: &str) -> Self {
        Self::at(Path::new(SYSFS_ROOT).join(name))
    }

    /// Supply rooted at an arbitrary directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// First battery found in sysfs.
    pub fn discover() -> Result<Self> {
        Self::discover_in(SYSFS_ROOT)
    }

    /// First of `BAT0`, `BAT1`, `BAT2` present under `root`.
    ///
    /// Fails with [`PowerError::SourceUnavailable`] when the system has no
    /// battery (desktop, VM).
    pub fn discover_in(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        BATTERIES
            .iter()
            .map(|name| root.join(name))
            .find(|dir| dir.exists())
            .map(Self::at)
            .ok_or_else(|| PowerError::SourceUnavailable {
                path:   root.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no battery found"),
            })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn current_path(&self) -> PathBuf {
        self.dir.join("current_now")
    }

    pub fn voltage_path(&self) -> PathBuf {
        self.dir.join("voltage_now")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_supply_lives_in_sysfs() {
        let supply = PowerSupply::new("BAT1");
        assert_eq!(
            supply.current_path(),
            PathBuf::from("/sys/class/power_supply/BAT1/current_now")
        );
        assert_eq!(
            supply.voltage_path(),
            PathBuf::from("/sys/class/power_supply/BAT1/voltage_now")
        );
    }

    #[test]
    fn discover_skips_missing_batteries() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("AC")).unwrap();
        std::fs::create_dir(root.path().join("BAT1")).unwrap();

        let supply = PowerSupply::discover_in(root.path()).unwrap();
        assert_eq!(supply.dir(), root.path().join("BAT1"));
    }

    #[test]
    fn discover_without_battery_fails() {
        let root = tempfile::tempdir().unwrap();
        assert!(matches!(
            PowerSupply::discover_in(root.path()),
            Err(PowerError::SourceUnavailable { .. })
        ));
    }
}
