use crate::buffer::SampleBuffer;
use chrono::{DateTime, Utc};
use power_core::{Ampere, Sample, Volt, Watt};
use std::fmt;
use std::time::{Duration, Instant};

/// Average consumption over a trailing window of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanResult {
    /// Mean current, voltage and power. The stamps are those of the newest
    /// folded sample, not the time of the query, so repeated queries over an
    /// unchanged buffer compare equal.
    pub sample:      Sample,
    /// Span actually covered, newest to oldest folded sample. Shorter than the
    /// requested window when not enough history exists.
    pub time_frame:  Duration,
    pub num_samples: usize,
}

impl MeanResult {
    /// Result over zero samples: zero means, no division. Stamped with the
    /// Unix epoch and the time of the call.
    pub fn empty() -> Self {
        Self {
            sample: Sample {
                instant:   DateTime::<Utc>::UNIX_EPOCH,
                monotonic: Instant::now(),
                current:   Ampere::default(),
                voltage:   Volt::default(),
                power:     Watt::default(),
            },
            time_frame:  Duration::ZERO,
            num_samples: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.num_samples == 0
    }
}

impl fmt::Display for MeanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# samples: {}", self.num_samples)?;
        writeln!(f, "TimeFrame: {:?}", self.time_frame)?;
        writeln!(f, "Current: {}", self.sample.current)?;
        writeln!(f, "Voltage: {}", self.sample.voltage)?;
        write!(f, "Power: {}", self.sample.power)
    }
}

/// Average the samples no older than `window` relative to the newest one.
///
/// Ages come from the monotonic stamps; the wall-clock stamps play no part.
/// The boundary is inclusive: a sample exactly `window` older than the newest
/// is folded in, the first one beyond it ends the walk. The walk never covers
/// more than one lap of the buffer.
pub fn aggregate(buffer: &SampleBuffer, window: Duration) -> MeanResult {
    let Some(latest) = buffer.latest_index() else {
        return MeanResult::empty();
    };
    let mut samples = buffer.iter_backward(latest, buffer.capacity());
    let Some(newest) = samples.next() else {
        return MeanResult::empty();
    };
    let start = newest.monotonic;

    let mut current = newest.current;
    let mut voltage = newest.voltage;
    let mut power = newest.power;
    let mut last = start;
    let mut count = 1usize;

    for sample in samples {
        if start.saturating_duration_since(sample.monotonic) > window {
            break;
        }
        current += sample.current;
        voltage += sample.voltage;
        power += sample.power;
        last = sample.monotonic;
        count += 1;
    }

    let n = count as f64;
    MeanResult {
        sample: Sample {
            instant:   newest.instant,
            monotonic: start,
            current:   current / n,
            voltage:   voltage / n,
            power:     power / n,
        },
        time_frame:  start.saturating_duration_since(last),
        num_samples: count,
    }
}
