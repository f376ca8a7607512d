//! # hue_scenes
//!
//! An async Rust library for running ambient lighting scenes on Philips Hue
//! lights.
//!
//! A scene is a group of lights, a color palette and a schedule. On every
//! tick it samples a fresh brightness, color and color temperature for each
//! light, occasionally makes a light "flash", and sends every light its new
//! state concurrently. One light failing never stops the others or the scene.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use hue_scenes::{BridgeGateway, Config, DryRunGateway};
//!
//! async fn halloween() -> Result<(), hue_scenes::Error> {
//!     let config = Config::load("demos/halloween.json")?;
//!     let gateway = Arc::new(DryRunGateway::new(config.lights.clone()));
//!     let discovered = gateway.discover_lights().await?;
//!
//!     let runner = config.build_runner(&gateway, &discovered)?;
//!     runner.run_until(async { tokio::signal::ctrl_c().await.ok(); }).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Palettes**: Pick colors from a [`ColorPalette`], never the same twice in a row
//! - **Sampling**: Beta-distributed brightness and warm color temperatures via [`ColorSampler`]
//! - **Gamut Conversion**: RGB to CIE xy clamped to the lamp's [`Gamut`]
//! - **Flashes**: Brief flashes with a per-scene cooldown, see [`Scene::plan_tick`]
//! - **Concurrent Dispatch**: Every light is commanded at once, failures are isolated
//! - **Many Scenes**: Run independent scenes side by side with [`SceneRunner`]
//! - **Configuration**: Describe scenes declaratively in JSON with [`Config`]
//! - **Pluggable Bridge**: Implement [`BridgeGateway`] for real hardware, or use [`DryRunGateway`]
//!
//! ## Runtime Selection
//!
//! This library is runtime-agnostic. Select your preferred runtime using feature flags:
//!
//! ### Using tokio (default)
//!
//! ```toml
//! [dependencies]
//! hue-scenes = "0.1"
//! tokio = { version = "1", features = ["rt-multi-thread", "macros"] }
//! ```
//!
//! ### Using smol
//!
//! ```toml
//! [dependencies]
//! hue-scenes = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! smol = "2"
//! ```
//!
//! ## Feature Flags
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-smol`: Use the smol runtime

mod config;
mod convert;
mod errors;
mod gateway;
mod light;
mod runner;
pub mod runtime;
mod sampler;
mod scene;
mod types;

// Re-export public API
pub use config::{Config, SceneConfig};
pub use convert::Gamut;
pub use errors::Error;
pub use gateway::{BridgeGateway, DryRunGateway, LightCommand};
pub use light::{LightId, LightTarget, resolve_targets};
pub use runner::SceneRunner;
pub use sampler::{ColorSampler, TemperatureClamp, TemperatureModel};
pub use scene::{
    PlannedCommand, Scene, SceneOptions, ScenePhase, SceneStats, TickPlan, TickReport,
};
pub use types::{
    Brightness, Color, ColorPalette, ColorPoint, LightState, Mired, TransitionTime,
};
