//! Compare coffee cooling in a preheated mug against a room-temperature mug.
//!
//! # Usage
//!
//! ```bash
//! # Built-in experiment, table on stdout
//! coffee-cooling
//!
//! # Own mug and measurements, chart to a file
//! coffee-cooling --config my_mug.toml --format svg > cooling.svg
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see derived values such as the
//! settled coffee temperature.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use coffee_cooling::config::ModelConfig;
use coffee_cooling::experiment::Experiment;
use coffee_cooling::physics::MugMaterial;
use coffee_cooling::report::{render, OutputFormat, TemperatureUnit};

#[derive(Parser, Debug)]
#[command(name = "coffee-cooling")]
#[command(about = "Newton's-law cooling of coffee in preheated vs. room-temperature mugs")]
#[command(version)]
struct Args {
    /// TOML file overriding the built-in experiment
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Display temperatures in Celsius
    #[arg(long)]
    celsius: bool,

    /// Mug material (ceramic, glass, stainless, plastic)
    #[arg(long)]
    material: Option<MugMaterial>,

    /// Plot duration in minutes
    #[arg(long)]
    duration: Option<f64>,

    /// Plot step in minutes
    #[arg(long)]
    step: Option<f64>,

    /// Leave out the creamer scenario
    #[arg(long)]
    no_creamer: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut ModelConfig) {
        if let Some(material) = self.material {
            config.mug.geometry.material = material;
        }
        if let Some(duration) = self.duration {
            config.plot.duration_min = duration;
        }
        if let Some(step) = self.step {
            config.plot.step_min = step;
        }
        if self.no_creamer {
            config.creamer.enabled = false;
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ModelConfig::read(args.config.as_deref()).with_context(|| match &args.config {
        Some(path) => format!("loading config from {}", path.display()),
        None => "loading default config".to_string(),
    })?;
    args.apply_overrides(&mut config);
    config.validate().context("invalid experiment parameters")?;

    info!(
        material = config.mug.geometry.material.name(),
        ambient_f = config.environment.ambient_temperature_f,
        k = config.environment.cooling_constant_per_min,
        "running cooling comparison"
    );

    let experiment = Experiment::from_config(&config).context("building scenarios")?;
    let report = experiment.run().context("evaluating scenarios")?;

    let unit = if args.celsius {
        TemperatureUnit::Celsius
    } else {
        TemperatureUnit::Fahrenheit
    };
    let rendered = render(&report, args.format, unit).context("rendering report")?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes()).context("writing report")?;
    stdout.flush()?;
    Ok(())
}
