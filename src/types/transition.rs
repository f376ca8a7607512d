//! Transition durations in gateway units.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long a light takes to fade to a new state, in units of 100ms.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TransitionTime {
    pub(crate) ticks: u16,
}

impl TransitionTime {
    const TICK_MS: u128 = 100;

    /// The fast snap used for flashes (3 seconds).
    pub const FLASH: TransitionTime = TransitionTime { ticks: 30 };

    pub fn from_ticks(ticks: u16) -> Self {
        TransitionTime { ticks }
    }

    /// Round a duration to the nearest 100ms, saturating at `u16::MAX` ticks.
    ///
    /// ```
    /// use std::time::Duration;
    /// use hue_scenes::TransitionTime;
    ///
    /// assert_eq!(TransitionTime::from_duration(Duration::from_secs(100)).ticks(), 1000);
    /// assert_eq!(TransitionTime::from_duration(Duration::from_millis(149)).ticks(), 1);
    /// assert_eq!(TransitionTime::from_duration(Duration::from_secs(100_000)).ticks(), u16::MAX);
    /// ```
    pub fn from_duration(duration: Duration) -> Self {
        let ticks = (duration.as_millis() + Self::TICK_MS / 2) / Self::TICK_MS;
        TransitionTime {
            ticks: u16::try_from(ticks).unwrap_or(u16::MAX),
        }
    }

    /// Number of 100ms units.
    pub fn ticks(&self) -> u16 {
        self.ticks
    }

    /// The fade length as a [`Duration`].
    ///
    /// ```
    /// use std::time::Duration;
    /// use hue_scenes::TransitionTime;
    ///
    /// assert_eq!(TransitionTime::FLASH.as_duration(), Duration::from_secs(3));
    /// ```
    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.ticks) * 100)
    }
}
