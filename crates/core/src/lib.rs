pub mod error;
pub mod sample;
pub mod units;

pub use error::{PowerError, Result};
pub use sample::Sample;
pub use units::{Ampere, Volt, Watt};
