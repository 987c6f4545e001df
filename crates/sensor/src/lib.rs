//! Reading current and voltage from the Linux `power_supply` class.

pub mod compose;
pub mod reader;
pub mod supply;

pub use compose::{SampleSource, SensorSources};
pub use reader::read_number;
pub use supply::PowerSupply;
