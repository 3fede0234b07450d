//! Comfy Anim CLI
//!
//! Headless driver for the animation engine: plays scenario files frame by
//! frame and prints what a renderer would draw.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_anim::{Easing, SpringPreset, DEFAULT_SPRING_MASS};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod runner;

use config::Scenario;

#[derive(Parser)]
#[command(name = "comfy-anim")]
#[command(author, version, about = "Fixed-point animation engine toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a scenario and print the per-frame trace
    Run {
        /// Scenario file
        scenario: PathBuf,

        /// Override the scenario's frame count
        #[arg(short, long)]
        frames: Option<u32>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Write a sample scenario file
    Init {
        /// Destination path
        #[arg(default_value = "scenario.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List spring presets
    Presets,

    /// Sample every easing curve
    Curves {
        /// Number of intervals between 0 and 1 (at most 256)
        #[arg(short, long, default_value_t = 8)]
        steps: u32,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            frames,
            format,
        } => cmd_run(scenario, frames, format),
        Commands::Init { path, force } => cmd_init(path, force),
        Commands::Presets => {
            cmd_presets();
            Ok(())
        }
        Commands::Curves { steps } => cmd_curves(steps),
    }
}

fn cmd_run(path: PathBuf, frames: Option<u32>, format: OutputFormat) -> Result<()> {
    let scenario = Scenario::load(&path)?;
    let frames = frames.unwrap_or(scenario.frames);
    tracing::info!(scenario = %path.display(), frames, "running scenario");

    let trace = runner::run(&scenario, frames)?;
    match format {
        OutputFormat::Table => print!("{}", trace.render_table()),
        OutputFormat::Json => println!("{}", trace.to_json()?),
    }
    Ok(())
}

fn cmd_init(path: PathBuf, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let content = Scenario::example().to_toml()?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("wrote sample scenario to {}", path.display());
    Ok(())
}

fn cmd_presets() {
    println!("{:<10} {:>8} {:>9}   (mass {DEFAULT_SPRING_MASS})", "preset", "tension", "friction");
    for preset in SpringPreset::ALL {
        println!(
            "{:<10} {:>8} {:>9}",
            preset.name(),
            preset.tension().to_int(),
            preset.friction().to_int()
        );
    }
}

fn cmd_curves(steps: u32) -> Result<()> {
    for easing in Easing::ALL {
        let name = easing.name().unwrap_or("custom");
        let samples: Vec<String> = runner::sample_curve(easing, steps)?
            .into_iter()
            .map(|y| format!("{:.4}({:#x})", y.to_f32(), y.to_bits()))
            .collect();
        println!("{name:<18} {}", samples.join(" "));
    }
    Ok(())
}
