//! Brightness levels.

use serde::{Deserialize, Serialize};

/// Brightness level from 0 to 100 percent.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Brightness {
    const MAX: u8 = 100;

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns None if value is above 100.
    pub fn create(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Brightness { value })
    }

    /// Scale a fraction in `[0, 1]` to a percentage, truncating.
    ///
    /// Out-of-range fractions are clamped.
    ///
    /// ```
    /// use hue_scenes::Brightness;
    ///
    /// assert_eq!(Brightness::from_fraction(0.859).value(), 85);
    /// assert_eq!(Brightness::from_fraction(1.7).value(), 100);
    /// assert_eq!(Brightness::from_fraction(-0.2).value(), 0);
    /// ```
    pub fn from_fraction(fraction: f64) -> Self {
        let percent = (fraction.clamp(0.0, 1.0) * f64::from(Self::MAX)) as u8;
        Brightness { value: percent }
    }
}
