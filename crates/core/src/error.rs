use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type shared by every powerwatch crate.
#[derive(Debug, Error)]
pub enum PowerError {
    #[error("cannot read '{}': {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' does not hold a number: {value:?}", .path.display())]
    MalformedValue { path: PathBuf, value: String },

    #[error("sample buffer needs at least 2 slots, got {capacity}")]
    CapacityTooSmall { capacity: usize },

    #[error("tick interval must be greater than zero")]
    InvalidInterval,

    #[error("log sink error: {0}")]
    LogSink(#[source] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T, E = PowerError> = std::result::Result<T, E>;
