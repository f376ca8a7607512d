//! Color palettes a scene samples from.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::types::Color;

/// An ordered list of colors with at least two distinct entries.
///
/// The distinctness guarantee is what lets [`crate::ColorSampler::select_color`]
/// always find a color different from the previous one.
///
/// ```
/// use hue_scenes::{Color, ColorPalette};
///
/// let red = Color::rgb(255, 0, 0);
/// assert!(ColorPalette::new(vec![red, red]).is_err());
///
/// let palette = ColorPalette::new(vec![red, Color::rgb(254, 0, 0)]).unwrap();
/// assert_eq!(palette.first(), red);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct ColorPalette {
    colors: Vec<Color>,
}

impl ColorPalette {
    /// Create a palette, failing with [`Error::PaletteTooSmall`] when fewer
    /// than two distinct colors are given.
    pub fn new(colors: Vec<Color>) -> Result<Self, Error> {
        let distinct = colors.iter().collect::<HashSet<_>>().len();
        if distinct < 2 {
            return Err(Error::PaletteTooSmall { distinct });
        }
        Ok(Self { colors })
    }

    /// The color a fresh scene starts from.
    pub fn first(&self) -> Color {
        self.colors[0]
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Never true for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get all colors in configured order.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn contains(&self, color: &Color) -> bool {
        self.colors.contains(color)
    }
}

impl TryFrom<Vec<Color>> for ColorPalette {
    type Error = Error;

    fn try_from(colors: Vec<Color>) -> Result<Self, Error> {
        Self::new(colors)
    }
}

impl From<ColorPalette> for Vec<Color> {
    fn from(palette: ColorPalette) -> Self {
        palette.colors
    }
}
