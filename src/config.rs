//! Declarative scene configuration.
//!
//! A configuration is a JSON document listing scenes by the display names of
//! their lights. Durations are given in (fractional) seconds.
//!
//! ```json
//! {
//!   "gamut": "A",
//!   "scenes": [
//!     {
//!       "name": "potions",
//!       "lights": ["Kt 1", "Kt 2", "Kt 3"],
//!       "palette": [[255, 0, 0], [0, 255, 0], [0, 0, 255]],
//!       "update_interval": 10,
//!       "synchronized": true,
//!       "transition": 1000
//!     }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};
use serde_with::{DurationSecondsWithFrac, serde_as};

use crate::convert::Gamut;
use crate::errors::Error;
use crate::gateway::BridgeGateway;
use crate::light::{LightTarget, resolve_targets};
use crate::runner::SceneRunner;
use crate::sampler::TemperatureModel;
use crate::scene::{Scene, SceneOptions};
use crate::types::{Color, ColorPalette, TransitionTime};

type Result<T> = std::result::Result<T, Error>;

fn default_update_interval() -> Duration {
    Duration::from_secs(1)
}

/// One scene as written in a configuration file.
#[serde_as]
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub name: String,
    /// Display names of member lights.
    pub lights: Vec<String>,
    /// Validated when the scene is built, so one bad scene names itself.
    pub palette: Vec<Color>,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    #[serde(default)]
    pub start_delay: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    #[serde(default = "default_update_interval")]
    pub update_interval: Duration,
    #[serde(default)]
    pub synchronized: bool,
    #[serde_as(as = "Option<DurationSecondsWithFrac<f64>>")]
    pub transition: Option<Duration>,
    #[serde_as(as = "Option<DurationSecondsWithFrac<f64>>")]
    pub flash_interval: Option<Duration>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SceneConfig {
    fn options(&self, config: &Config) -> SceneOptions {
        SceneOptions {
            start_delay: self.start_delay,
            update_interval: self.update_interval,
            synchronized: self.synchronized,
            transition: self.transition.map(TransitionTime::from_duration),
            flash_interval: self.flash_interval,
            dispatch_timeout: config.dispatch_timeout,
            temperature: config.temperature,
            seed: self.seed,
        }
    }
}

/// A complete configuration: gamut, temperature model and scenes.
#[serde_as]
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gamut: Gamut,
    #[serde(default)]
    pub temperature: TemperatureModel,
    #[serde_as(as = "Option<DurationSecondsWithFrac<f64>>")]
    pub dispatch_timeout: Option<Duration>,
    /// Lights known without discovery, used by the dry-run gateway.
    #[serde(default)]
    pub lights: Vec<LightTarget>,
    pub scenes: Vec<SceneConfig>,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::JsonLoad)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&json)
    }

    /// Build one scene per entry from the lights the gateway discovered.
    ///
    /// Every scene is validated before any is returned, so a bad palette
    /// anywhere aborts the whole setup.
    pub fn build_scenes<G: BridgeGateway>(
        &self,
        gateway: &Arc<G>,
        discovered: &[LightTarget],
    ) -> Result<Vec<Scene<G>>> {
        self.scenes
            .iter()
            .map(|scene| {
                let palette = ColorPalette::new(scene.palette.clone())?;
                let lights = resolve_targets(discovered, &scene.lights);
                info!(
                    "[{}] lights: {:?}",
                    scene.name,
                    lights.iter().map(LightTarget::name).collect::<Vec<_>>()
                );
                Scene::new(
                    &scene.name,
                    Arc::clone(gateway),
                    self.gamut,
                    lights,
                    palette,
                    scene.options(self),
                )
            })
            .collect()
    }

    /// Build all scenes into a runner.
    pub fn build_runner<G: BridgeGateway + 'static>(
        &self,
        gateway: &Arc<G>,
        discovered: &[LightTarget],
    ) -> Result<SceneRunner<G>> {
        let mut runner = SceneRunner::new();
        for scene in self.build_scenes(gateway, discovered)? {
            runner.push(scene);
        }
        Ok(runner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::DryRunGateway;
    use crate::sampler::TemperatureClamp;

    const HALLOWEEN: &str = include_str!("../demos/halloween.json");

    #[test]
    fn test_halloween_preset_parses() {
        let config = Config::from_json(HALLOWEEN).unwrap();
        assert_eq!(config.gamut, Gamut::A);
        assert_eq!(config.temperature, TemperatureModel::default());

        let names: Vec<&str> = config.scenes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["horror", "spider", "graveyard", "potions"]);

        let horror = &config.scenes[0];
        assert_eq!(horror.update_interval, Duration::from_millis(500));
        assert_eq!(horror.flash_interval, Some(Duration::from_secs(65)));
        assert_eq!(
            horror.options(&config).transition,
            Some(TransitionTime::from_ticks(1000))
        );

        let potions = &config.scenes[3];
        assert!(potions.synchronized);
        assert_eq!(potions.flash_interval, None);
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_json(
            r#"{"scenes": [{"name": "s", "lights": [], "palette": [[1,1,1],[2,2,2]]}]}"#,
        )
        .unwrap();
        let scene = &config.scenes[0];
        assert_eq!(scene.start_delay, Duration::ZERO);
        assert_eq!(scene.update_interval, Duration::from_secs(1));
        assert!(!scene.synchronized);
        assert_eq!(scene.transition, None);
        assert!(config.lights.is_empty());
    }

    #[test]
    fn test_corrected_temperature_section() {
        let config = Config::from_json(
            r#"{"temperature": {"clamp": "corrected", "max_kelvin": 2700}, "scenes": []}"#,
        )
        .unwrap();
        assert_eq!(config.temperature.clamp, TemperatureClamp::Corrected);
        assert_eq!(config.temperature.min_kelvin, 1000);
        assert_eq!(config.temperature.max_kelvin, 2700);
    }

    #[test]
    fn test_bad_palette_aborts_setup() {
        let config = Config::from_json(
            r#"{"scenes": [
                {"name": "ok", "lights": ["a"], "palette": [[1,1,1],[2,2,2]]},
                {"name": "dull", "lights": ["a"], "palette": [[9,9,9],[9,9,9]]}
            ]}"#,
        )
        .unwrap();
        let gateway = Arc::new(DryRunGateway::default());
        let err = config.build_runner(&gateway, &[]).err().unwrap();
        assert!(err.is_configuration());
        assert_eq!(err, Error::PaletteTooSmall { distinct: 1 });
    }

    #[test]
    fn test_build_resolves_lights_per_scene() {
        let config = Config::from_json(HALLOWEEN).unwrap();
        let gateway = Arc::new(DryRunGateway::new(config.lights.clone()));
        let scenes = config.build_scenes(&gateway, &config.lights).unwrap();

        let sizes: Vec<usize> = scenes.iter().map(|s| s.lights().len()).collect();
        assert_eq!(sizes, [6, 6, 3, 3]);
        assert_eq!(scenes[2].options().start_delay, Duration::from_secs(40));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/scenes.json").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_round_trip_skips_unset_options() {
        let config = Config::from_json(
            r#"{"scenes": [{
                "name": "s", "lights": ["a"], "palette": [[1,1,1],[2,2,2]], "update_interval": 0.5
            }]}"#,
        )
        .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("flash_interval"));
        assert!(json.contains(r#""update_interval":0.5"#));
    }
}
