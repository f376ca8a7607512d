//! Sampled light states.

use serde::{Deserialize, Serialize};

use crate::types::{Brightness, Color, ColorPoint, Mired};

/// One freshly sampled visual state.
///
/// A new value is produced on every tick and never modified afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct LightState {
    brightness: Brightness,
    color: Color,
    color_point: ColorPoint,
    color_temperature: Mired,
}

impl LightState {
    pub fn new(
        brightness: Brightness,
        color: Color,
        color_point: ColorPoint,
        color_temperature: Mired,
    ) -> Self {
        Self {
            brightness,
            color,
            color_point,
            color_temperature,
        }
    }

    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// The palette color the chromaticity point was converted from.
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn color_point(&self) -> ColorPoint {
        self.color_point
    }

    pub fn color_temperature(&self) -> Mired {
        self.color_temperature
    }
}
