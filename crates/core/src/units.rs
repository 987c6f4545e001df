//! Electrical quantities stored in micro-units, as exposed by the kernel's
//! `power_supply` class.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul};

/// Current in microamperes.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Ampere(pub f64);

/// Voltage in microvolts.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Volt(pub f64);

/// Power in microwatts.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Watt(pub f64);

macro_rules! micro_unit {
    ($ty:ident, [$micro:literal, $milli:literal, $base:literal]) => {
        impl $ty {
            /// Raw value in micro-units.
            #[must_use]
            pub fn micros(self) -> f64 {
                self.0
            }
        }

        impl Add for $ty {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl AddAssign for $ty {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Div<f64> for $ty {
            type Output = Self;

            fn div(self, rhs: f64) -> Self {
                Self(self.0 / rhs)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&format_scaled(self.0, [$micro, $milli, $base]))
            }
        }
    };
}

micro_unit!(Ampere, ["uA", "mA", "A"]);
micro_unit!(Volt, ["uV", "mV", "V"]);
micro_unit!(Watt, ["uW", "mW", "W"]);

impl Mul<Volt> for Ampere {
    type Output = Watt;

    /// µA · µV = 1e-12 W, so divide by 1e6 to land in µW.
    fn mul(self, rhs: Volt) -> Watt {
        Watt(self.0 * rhs.0 / 1e6)
    }
}

/// Format a micro-unit value with three decimals, stepping up by 1000 until it
/// fits or the largest unit is reached (e.g. `"1.500mA"`).
pub fn format_scaled(micros: f64, units: [&str; 3]) -> String {
    let mut value = micros;
    let mut idx = 0;
    while value.abs() >= 1000.0 && idx < units.len() - 1 {
        value /= 1000.0;
        idx += 1;
    }
    format!("{value:.3}{}", units[idx])
}
