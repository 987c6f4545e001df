use crate::aggregate::{aggregate, MeanResult};
use crate::buffer::SampleBuffer;
use parking_lot::RwLock;
use power_config::WatcherConfig;
use power_core::{PowerError, Result, Sample};
use power_sensor::{SampleSource, SensorSources};
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Construction parameters for a [`Watcher`].
pub struct WatcherOptions {
    /// Receives one CSV line per sample; `None` disables logging.
    pub log_sink:      Option<Box<dyn Write + Send>>,
    pub tick_interval: Duration,
    /// History span to keep. Capacity is `max_window / tick_interval`, rounded down.
    pub max_window:    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Created,
    Running,
    Stopped,
}

/// Samples a [`SampleSource`] on a fixed interval and answers mean queries
/// over the retained history.
///
/// # Example
/// ```no_run
/// # async fn run(sources: power_sensor::SensorSources) -> power_core::Result<()> {
/// use power_watcher::{Watcher, WatcherOptions};
/// use std::time::Duration;
///
/// let mut watcher = Watcher::new(
///     WatcherOptions {
///         log_sink:      None,
///         tick_interval: Duration::from_secs(1),
///         max_window:    Duration::from_secs(600),
///     },
///     sources,
/// )?;
/// tokio::time::sleep(Duration::from_secs(30)).await;
/// println!("{}", watcher.mean(Duration::from_secs(30)));
/// watcher.stop().await;
/// # Ok(())
/// # }
/// ```
pub struct Watcher {
    buffer:        Arc<RwLock<SampleBuffer>>,
    tick_interval: Duration,
    state:         WatcherState,
    cancel:        CancellationToken,
    task:          Option<JoinHandle<()>>,
}

impl Watcher {
    /// Allocate the sample buffer and start sampling immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new<S: SampleSource>(options: WatcherOptions, source: S) -> Result<Self> {
        let capacity = capacity_for(options.tick_interval, options.max_window)?;
        let buffer = Arc::new(RwLock::new(SampleBuffer::with_capacity(capacity)?));
        let cancel = CancellationToken::new();

        let mut watcher = Self {
            buffer: Arc::clone(&buffer),
            tick_interval: options.tick_interval,
            state: WatcherState::Created,
            cancel: cancel.clone(),
            task: None,
        };

        let task = tokio::spawn(sampling_loop(
            source,
            buffer,
            options.log_sink,
            options.tick_interval,
            cancel,
        ));
        watcher.task = Some(task);
        watcher.state = WatcherState::Running;

        info!(
            "Watcher started: {capacity} slots, sampling every {:?}",
            options.tick_interval
        );
        Ok(watcher)
    }

    /// Build a watcher over the sysfs sources and log file named in `config`.
    pub fn from_config(config: &WatcherConfig, sources: SensorSources) -> Result<Self> {
        let log_sink = match &config.log_file {
            Some(path) => {
                let file = OpenOptions::new()
                    .append(true)
                    .create(true)
                    .open(path)
                    .map_err(PowerError::LogSink)?;
                Some(Box::new(file) as Box<dyn Write + Send>)
            }
            None => None,
        };

        Self::new(
            WatcherOptions {
                log_sink,
                tick_interval: config.tick_interval(),
                max_window: config.max_window(),
            },
            sources,
        )
    }

    /// Mean consumption over the trailing `duration`.
    ///
    /// Safe to call while sampling is running; the walk sees a consistent
    /// snapshot of the buffer.
    pub fn mean(&self, duration: Duration) -> MeanResult {
        aggregate(&self.buffer.read(), duration)
    }

    /// Most recent sample, if any has been taken.
    pub fn latest(&self) -> Option<Sample> {
        self.buffer.read().latest().copied()
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.buffer.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.read().capacity()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    /// Stop sampling and wait for the loop to release the log sink.
    ///
    /// The history stays queryable afterwards. Calling `stop` twice is a no-op.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("Sampling task ended abnormally: {e}");
            }
        }
        if self.state != WatcherState::Stopped {
            info!("Watcher stopped");
        }
        self.state = WatcherState::Stopped;
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Number of slots needed to keep `max_window` of history at one sample per tick.
fn capacity_for(tick_interval: Duration, max_window: Duration) -> Result<usize> {
    if tick_interval.is_zero() {
        return Err(PowerError::InvalidInterval);
    }
    let slots = max_window.as_nanos() / tick_interval.as_nanos();
    let capacity = usize::try_from(slots).unwrap_or(usize::MAX);
    if capacity < 2 {
        return Err(PowerError::CapacityTooSmall { capacity });
    }
    Ok(capacity)
}

/// One CSV record: `<unix nanos>,<current>,<voltage>,<power>`.
pub fn format_record(sample: &Sample) -> String {
    format!(
        "{},{:.0},{:.0},{:.0}\n",
        sample.unix_nanos(),
        sample.current.micros(),
        sample.voltage.micros(),
        sample.power.micros()
    )
}

async fn sampling_loop<S: SampleSource>(
    source: S,
    buffer: Arc<RwLock<SampleBuffer>>,
    mut log_sink: Option<Box<dyn Write + Send>>,
    tick_interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let sample = match source.sample() {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Skipping sample: {e}");
                continue;
            }
        };

        buffer.write().push(sample);
        debug!(
            current = sample.current.micros(),
            voltage = sample.voltage.micros(),
            power = sample.power.micros(),
            "Sample recorded"
        );

        if let Some(sink) = log_sink.as_mut() {
            if let Err(e) = sink.write_all(format_record(&sample).as_bytes()) {
                warn!("Cannot write sample to log: {e}");
            }
        }
    }

    if let Some(mut sink) = log_sink.take() {
        if let Err(e) = sink.flush() {
            warn!("Cannot flush sample log: {e}");
        }
    }
}
