//! Value types for light state parameters.

mod brightness;
mod color;
mod color_point;
mod mired;
mod palette;
mod state;
mod transition;

pub use brightness::Brightness;
pub use color::Color;
pub use color_point::ColorPoint;
pub use mired::Mired;
pub use palette::ColorPalette;
pub use state::LightState;
pub use transition::TransitionTime;
