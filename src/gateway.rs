//! The bridge seam: per-light state commands.

use std::collections::HashMap;
use std::future::Future;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::light::{LightId, LightTarget};
use crate::runtime::Mutex;
use crate::types::{Brightness, ColorPoint, LightState, Mired, TransitionTime};

type Result<T> = std::result::Result<T, Error>;

/// A "set state" command for one light.
///
/// Unset fields are left unchanged on the light.
///
/// ```
/// use hue_scenes::{Brightness, LightCommand, TransitionTime};
///
/// let command = LightCommand::on()
///     .with_brightness(Brightness::create(80).unwrap())
///     .with_transition(Some(TransitionTime::FLASH));
/// assert!(command.on);
/// assert!(command.color_point.is_none());
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightCommand {
    pub on: bool,
    pub brightness: Option<Brightness>,
    pub color_point: Option<ColorPoint>,
    pub color_temperature: Option<Mired>,
    pub transition: Option<TransitionTime>,
}

impl LightCommand {
    /// A command that only switches the light on.
    pub fn on() -> Self {
        LightCommand {
            on: true,
            ..Self::default()
        }
    }

    /// Switch on with the brightness and color of `state`.
    pub fn from_state(state: &LightState) -> Self {
        Self::on()
            .with_brightness(state.brightness())
            .with_color_point(state.color_point())
    }

    pub fn with_brightness(mut self, brightness: Brightness) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn with_color_point(mut self, point: ColorPoint) -> Self {
        self.color_point = Some(point);
        self
    }

    pub fn with_color_temperature(mut self, mired: Mired) -> Self {
        self.color_temperature = Some(mired);
        self
    }

    pub fn with_transition(mut self, transition: Option<TransitionTime>) -> Self {
        self.transition = transition;
        self
    }
}

/// Something that knows the lights on the network and can command them.
///
/// Implementations must be safe to share between scenes: commands for
/// distinct lights may be issued concurrently. A failed command is returned
/// as an error, never a panic.
pub trait BridgeGateway: Send + Sync {
    /// Enumerate all lights known to the bridge.
    fn discover_lights(&self) -> impl Future<Output = Result<Vec<LightTarget>>> + Send;

    /// Apply a command to one light.
    fn set_light_state(
        &self,
        id: &LightId,
        command: &LightCommand,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// A gateway that only logs commands and remembers the last one per light.
///
/// Useful to preview a configuration without touching real hardware.
/// Discovery fails when no lights were given, since nothing could be
/// commanded.
///
/// ```ignore
/// let gateway = DryRunGateway::new(vec![LightTarget::new("1", "Kt 1")]);
/// gateway.set_light_state(&"1".into(), &LightCommand::on()).await?;
/// assert_eq!(gateway.state(&"1".into()).await, Some(LightCommand::on()));
/// ```
#[derive(Debug, Default)]
pub struct DryRunGateway {
    lights: Vec<LightTarget>,
    states: Mutex<HashMap<LightId, LightCommand>>,
}

impl DryRunGateway {
    pub fn new(lights: Vec<LightTarget>) -> Self {
        DryRunGateway {
            lights,
            states: Mutex::new(HashMap::new()),
        }
    }

    pub fn lights(&self) -> &[LightTarget] {
        &self.lights
    }

    /// The last command applied to a light, if any.
    pub async fn state(&self, id: &LightId) -> Option<LightCommand> {
        self.states.lock().await.get(id).copied()
    }

    fn name_of(&self, id: &LightId) -> Option<&str> {
        self.lights
            .iter()
            .find(|light| light.id() == id)
            .map(|light| light.name())
    }
}

impl BridgeGateway for DryRunGateway {
    async fn discover_lights(&self) -> Result<Vec<LightTarget>> {
        if self.lights.is_empty() {
            return Err(Error::Discovery(String::from(
                "no lights configured for the dry run",
            )));
        }
        debug!("dry run: {} known lights", self.lights.len());
        Ok(self.lights.clone())
    }

    async fn set_light_state(&self, id: &LightId, command: &LightCommand) -> Result<()> {
        let Some(name) = self.name_of(id) else {
            return Err(Error::UnknownLight(id.clone()));
        };

        info!(
            "dry run: {} <- {}",
            name,
            serde_json::to_string(command).unwrap_or_default()
        );
        self.states.lock().await.insert(id.clone(), *command);
        Ok(())
    }
}
