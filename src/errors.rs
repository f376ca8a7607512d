use std::path::PathBuf;
use std::time::Duration;

use crate::light::LightId;

/// All error types that can occur while configuring or running scenes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A palette must offer at least two distinct colors to pick from.
    #[error("color palette needs at least two distinct colors, found {distinct}")]
    PaletteTooSmall { distinct: usize },

    /// Color temperature clamp bounds are unusable.
    #[error("invalid color temperature bounds {min}K..{max}K")]
    InvalidTemperatureBounds { min: u32, max: u32 },

    /// Sampling distribution parameters were rejected.
    #[error("invalid distribution parameters: {0}")]
    Distribution(rand_distr::BetaError),

    /// A scene was configured with a zero update interval.
    #[error("scene {0} has a zero update interval")]
    ZeroUpdateInterval(String),

    /// Failed to parse a [`crate::Color`] from a string.
    #[error("invalid color string: {0}")]
    InvalidColorString(String),

    /// Failed to deserialize a configuration document.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// Failed to read a configuration file.
    #[error("failed to read {path:?}: {err:?}")]
    Io { path: PathBuf, err: std::io::Error },

    /// The gateway does not know the addressed light.
    #[error("unknown light {0}")]
    UnknownLight(LightId),

    /// The gateway failed to apply a command to a light.
    #[error("failed to set state of light {light}: {reason}")]
    Dispatch { light: LightId, reason: String },

    /// The gateway did not answer within the scene's dispatch timeout.
    #[error("light {light} did not respond within {timeout:?}")]
    DispatchTimeout { light: LightId, timeout: Duration },

    /// Listing the lights known to the gateway failed.
    #[error("light discovery failed: {0}")]
    Discovery(String),
}

impl Error {
    /// Create a new dispatch error
    pub fn dispatch(light: &LightId, reason: impl Into<String>) -> Self {
        Error::Dispatch {
            light: light.clone(),
            reason: reason.into(),
        }
    }

    /// Create a new dispatch timeout error
    pub fn dispatch_timeout(light: &LightId, timeout: Duration) -> Self {
        Error::DispatchTimeout {
            light: light.clone(),
            timeout,
        }
    }

    /// Create a new io error for the given path
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            err,
        }
    }

    /// Whether the error can only occur while setting scenes up.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::PaletteTooSmall { .. }
                | Error::InvalidTemperatureBounds { .. }
                | Error::Distribution(_)
                | Error::ZeroUpdateInterval(_)
                | Error::InvalidColorString(_)
                | Error::JsonLoad(_)
                | Error::Io { .. }
        )
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
