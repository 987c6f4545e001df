//! Background power sampling with time-windowed averages.

pub mod aggregate;
pub mod buffer;
pub mod watcher;

pub use aggregate::{aggregate, MeanResult};
pub use buffer::SampleBuffer;
pub use watcher::{Watcher, WatcherOptions, WatcherState};
