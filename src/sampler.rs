//! Randomized state generation.
//!
//! Brightness and color temperature come from fixed Beta distributions.
//! Brightness uses Beta(10, 2), which sits mostly between 70% and 95% with an
//! occasional dim flicker. Color temperature uses Beta(10, 35) scaled to
//! Kelvin and then clamped, see [`TemperatureClamp`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Beta, Distribution};
use serde::{Deserialize, Serialize};

use crate::convert::Gamut;
use crate::errors::Error;
use crate::types::{Brightness, Color, ColorPalette, LightState, Mired};

type Result<T> = std::result::Result<T, Error>;

/// How a sampled Kelvin value is forced into the configured bounds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureClamp {
    /// `max(min(k, min_kelvin), max_kelvin)`.
    ///
    /// The bounds are applied in swapped order, so every sample collapses
    /// to `max_kelvin`. This is how the scenes have always looked.
    #[default]
    Literal,
    /// `clamp(k, min_kelvin, max_kelvin)`.
    Corrected,
}

/// Color temperature bounds and the clamp applied to samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureModel {
    pub clamp: TemperatureClamp,
    pub min_kelvin: u32,
    pub max_kelvin: u32,
}

impl Default for TemperatureModel {
    fn default() -> Self {
        Self {
            clamp: TemperatureClamp::Literal,
            min_kelvin: 1000,
            max_kelvin: 3000,
        }
    }
}

impl TemperatureModel {
    /// The default bounds with the clamp applied in the intended order.
    pub fn corrected() -> Self {
        Self {
            clamp: TemperatureClamp::Corrected,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_kelvin == 0 || self.min_kelvin > self.max_kelvin {
            return Err(Error::InvalidTemperatureBounds {
                min: self.min_kelvin,
                max: self.max_kelvin,
            });
        }
        Ok(())
    }

    /// Force a sampled Kelvin value into the bounds.
    ///
    /// ```
    /// use hue_scenes::TemperatureModel;
    ///
    /// assert_eq!(TemperatureModel::default().apply(2200), 3000);
    /// assert_eq!(TemperatureModel::corrected().apply(2200), 2200);
    /// assert_eq!(TemperatureModel::corrected().apply(640), 1000);
    /// ```
    pub fn apply(&self, kelvin: u32) -> u32 {
        match self.clamp {
            TemperatureClamp::Literal => kelvin.min(self.min_kelvin).max(self.max_kelvin),
            TemperatureClamp::Corrected => kelvin.clamp(self.min_kelvin, self.max_kelvin),
        }
    }
}

/// Produces randomized, never-consecutively-repeating light states.
///
/// ```
/// use hue_scenes::{Color, ColorPalette, ColorSampler, TemperatureModel};
///
/// let palette = ColorPalette::new(vec![Color::rgb(255, 0, 0), Color::rgb(0, 0, 255)]).unwrap();
/// let mut sampler = ColorSampler::seeded(7, TemperatureModel::default()).unwrap();
///
/// let next = sampler.select_color(&palette, &Color::rgb(255, 0, 0));
/// assert_eq!(next, Color::rgb(0, 0, 255));
/// assert!(sampler.sample_brightness().value() <= 100);
/// assert_eq!(sampler.sample_color_temperature().value(), 333);
/// ```
#[derive(Debug, Clone)]
pub struct ColorSampler {
    rng: StdRng,
    brightness: Beta<f64>,
    temperature: Beta<f64>,
    model: TemperatureModel,
}

impl ColorSampler {
    /// Draws allowed before falling back to an explicit pick among the other colors.
    const MAX_DRAWS: usize = 64;
    const KELVIN_SCALE: f64 = 10_000.0;

    /// Create a sampler seeded from the operating system.
    pub fn new(model: TemperatureModel) -> Result<Self> {
        Self::with_rng(StdRng::from_os_rng(), model)
    }

    /// Create a sampler with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64, model: TemperatureModel) -> Result<Self> {
        Self::with_rng(StdRng::seed_from_u64(seed), model)
    }

    fn with_rng(rng: StdRng, model: TemperatureModel) -> Result<Self> {
        model.validate()?;
        Ok(Self {
            rng,
            brightness: Beta::new(10.0, 2.0).map_err(Error::Distribution)?,
            temperature: Beta::new(10.0, 35.0).map_err(Error::Distribution)?,
            model,
        })
    }

    pub fn model(&self) -> &TemperatureModel {
        &self.model
    }

    /// Pick a palette color that differs from `previous`.
    ///
    /// Draws uniformly and rejects repeats. The palette guarantees a second
    /// distinct color, and after [`Self::MAX_DRAWS`] rejections the pick is
    /// made directly among the non-matching entries, so this always returns.
    pub fn select_color(&mut self, palette: &ColorPalette, previous: &Color) -> Color {
        let colors = palette.colors();
        for _ in 0..Self::MAX_DRAWS {
            let candidate = colors[self.rng.random_range(0..colors.len())];
            if candidate != *previous {
                return candidate;
            }
        }

        let others: Vec<Color> = colors.iter().copied().filter(|c| c != previous).collect();
        others[self.rng.random_range(0..others.len())]
    }

    /// Brightness percentage drawn from Beta(10, 2).
    pub fn sample_brightness(&mut self) -> Brightness {
        Brightness::from_fraction(self.brightness.sample(&mut self.rng))
    }

    /// Color temperature drawn from Beta(10, 35) Kelvin, clamped, in mired.
    pub fn sample_color_temperature(&mut self) -> Mired {
        let kelvin = (self.temperature.sample(&mut self.rng) * Self::KELVIN_SCALE) as u32;
        Mired::from_kelvin(self.model.apply(kelvin))
    }

    /// A fair coin, used for per-light flash decisions.
    pub fn coin_flip(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    /// Sample a complete state, advancing `last_color` to the chosen color.
    pub fn sample_state(
        &mut self,
        palette: &ColorPalette,
        last_color: &mut Color,
        gamut: Gamut,
    ) -> LightState {
        let brightness = self.sample_brightness();
        let color = self.select_color(palette, last_color);
        *last_color = color;
        let color_temperature = self.sample_color_temperature();
        LightState::new(brightness, color, gamut.rgb_to_xy(color), color_temperature)
    }
}
