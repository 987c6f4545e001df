use crate::units::{Ampere, Volt, Watt};
use chrono::{DateTime, Utc};
use std::time::Instant;

/// Current, voltage and power drawn by the system at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Wall-clock time, only used for display and the CSV log.
    pub instant:   DateTime<Utc>,
    /// Monotonic time; all window arithmetic uses this stamp so wall-clock
    /// steps cannot reorder samples.
    pub monotonic: Instant,
    pub current:   Ampere,
    pub voltage:   Volt,
    pub power:     Watt,
}

impl Sample {
    /// Build a sample, deriving power from current and voltage.
    pub fn new(instant: DateTime<Utc>, monotonic: Instant, current: Ampere, voltage: Volt) -> Self {
        Self {
            instant,
            monotonic,
            current,
            voltage,
            power: current * voltage,
        }
    }

    /// Sample stamped with the current wall-clock and monotonic time.
    pub fn now(current: Ampere, voltage: Volt) -> Self {
        Self::new(Utc::now(), Instant::now(), current, voltage)
    }

    /// Unix timestamp in nanoseconds, saturating outside the representable range
    /// (roughly years 1677–2262).
    #[must_use]
    pub fn unix_nanos(&self) -> i64 {
        self.instant.timestamp_nanos_opt().unwrap_or(if self.instant.timestamp() < 0 {
            i64::MIN
        } else {
            i64::MAX
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn power_is_derived_in_microwatts() {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let sample = Sample::new(at, Instant::now(), Ampere(1_500_000.0), Volt(12_000_000.0));
        assert_eq!(sample.power, Watt(18_000_000.0));
    }

    #[test]
    fn now_stamps_both_clocks() {
        let before = Instant::now();
        let sample = Sample::now(Ampere(1.0), Volt(1.0));
        assert!(sample.monotonic >= before);
        assert!(sample.instant.timestamp() > 0);
    }

    #[test]
    fn unix_nanos_of_epoch_offset() {
        let at = Utc.timestamp_opt(2, 5).unwrap();
        let sample = Sample::new(at, Instant::now(), Ampere(0.0), Volt(0.0));
        assert_eq!(sample.unix_nanos(), 2_000_000_005);
    }
}
