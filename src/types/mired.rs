//! Color temperature in mired.

use serde::{Deserialize, Serialize};

/// Color temperature as a reciprocal megakelvin value (10^6 / Kelvin).
///
/// Lower values are cooler light, higher values warmer. 3000K is roughly
/// 333 mired, 1000K is 1000 mired.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Mired {
    pub(crate) value: u32,
}

impl Mired {
    /// Convert a Kelvin temperature, rounding to the nearest mired.
    ///
    /// A zero Kelvin input is treated as 1K.
    ///
    /// ```
    /// use hue_scenes::Mired;
    ///
    /// assert_eq!(Mired::from_kelvin(3000).value(), 333);
    /// assert_eq!(Mired::from_kelvin(1000).value(), 1000);
    /// assert_eq!(Mired::from_kelvin(2700).value(), 370);
    /// ```
    pub fn from_kelvin(kelvin: u32) -> Self {
        let kelvin = f64::from(kelvin.max(1));
        Mired {
            value: (1_000_000.0 / kelvin).round() as u32,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Approximate Kelvin temperature this value corresponds to.
    ///
    /// ```
    /// use hue_scenes::Mired;
    ///
    /// assert_eq!(Mired::from_kelvin(3000).to_kelvin(), 3003);
    /// assert_eq!(Mired::from_kelvin(1000).to_kelvin(), 1000);
    /// ```
    pub fn to_kelvin(&self) -> u32 {
        (1_000_000.0 / f64::from(self.value.max(1))).round() as u32
    }
}
