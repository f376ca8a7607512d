//! CLI application for previewing lighting scenes.
//!
//! Scenes run against the dry-run gateway, which logs every command instead
//! of sending it to a bridge. Set `RUST_LOG=info` to watch the commands.
//!
//! Run with: cargo run --example scene_cli -- --help

use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use hue_scenes::{
    BridgeGateway, Color, ColorPalette, ColorSampler, Config, DryRunGateway, Gamut,
    TemperatureModel,
};

#[derive(Parser)]
#[command(name = "scene-cli")]
#[command(about = "Preview ambient lighting scenes without a bridge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every scene in a configuration until Ctrl-C
    Run {
        /// Path to the scene configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Override the configured color gamut (A, B or C)
        #[arg(short, long, value_parser = Gamut::from_str)]
        gamut: Option<Gamut>,

        /// Clamp sampled color temperatures into the configured bounds
        #[arg(long)]
        corrected_temperature: bool,
    },

    /// Validate a configuration and show which lights each scene controls
    Check {
        /// Path to the scene configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Print randomized states drawn from a palette
    Sample {
        /// Palette color as "r,g,b", repeat for each color (at least two distinct)
        #[arg(short, long = "palette", required = true)]
        palette: Vec<String>,

        /// Number of states to draw
        #[arg(short, long, default_value = "10")]
        count: usize,

        /// Color gamut used for the xy conversion (A, B or C)
        #[arg(short, long, default_value = "A", value_parser = Gamut::from_str)]
        gamut: Gamut,

        /// Fixed seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,

        /// Clamp sampled color temperatures into the default bounds
        #[arg(long)]
        corrected_temperature: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        })
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            gamut,
            corrected_temperature,
        } => {
            let mut config = Config::load(&config)?;
            if let Some(gamut) = gamut {
                config.gamut = gamut;
            }
            if corrected_temperature {
                config.temperature = TemperatureModel {
                    clamp: TemperatureModel::corrected().clamp,
                    ..config.temperature
                };
            }

            let gateway = Arc::new(DryRunGateway::new(config.lights.clone()));
            let discovered = gateway.discover_lights().await?;
            let runner = config.build_runner(&gateway, &discovered)?;

            println!("Running {} scene(s), press Ctrl-C to stop...", runner.len());
            runner
                .run_until(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        eprintln!("Failed to listen for Ctrl-C: {}", e);
                    }
                })
                .await;
            println!("Stopped.");
        }

        Commands::Check { config } => {
            let config = Config::load(&config)?;
            let gateway = Arc::new(DryRunGateway::new(config.lights.clone()));
            let scenes = config.build_scenes(&gateway, &config.lights)?;

            println!("Configuration OK (gamut {}):", config.gamut);
            for (scene, entry) in scenes.iter().zip(&config.scenes) {
                println!(
                    "  {:12} {} of {} light(s), {} color(s), every {:?}",
                    scene.name(),
                    scene.lights().len(),
                    entry.lights.len(),
                    scene.palette().len(),
                    scene.options().update_interval
                );
                for light in scene.lights() {
                    println!("      {} ({})", light.name(), light.id());
                }
            }
        }

        Commands::Sample {
            palette,
            count,
            gamut,
            seed,
            corrected_temperature,
        } => {
            let colors = palette
                .iter()
                .map(|c| Color::from_str(c))
                .collect::<Result<Vec<_>, _>>()?;
            let palette = ColorPalette::new(colors)?;
            let model = if corrected_temperature {
                TemperatureModel::corrected()
            } else {
                TemperatureModel::default()
            };
            let mut sampler = match seed {
                Some(seed) => ColorSampler::seeded(seed, model)?,
                None => ColorSampler::new(model)?,
            };

            let mut last_color = palette.first();
            for _ in 0..count {
                let state = sampler.sample_state(&palette, &mut last_color, gamut);
                let point = state.color_point();
                println!(
                    "  brightness {:3}%  rgb {}  xy ({:.4}, {:.4})  {} mired",
                    state.brightness().value(),
                    state.color(),
                    point.x,
                    point.y,
                    state.color_temperature().value()
                );
            }
        }
    }

    Ok(())
}
