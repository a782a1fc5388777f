//! Radar input loader.
//!
//! Resolves the observation window ending at an anchor time, loads and
//! assembles it, and prints a JSON summary to stdout. Logs go to stderr.

mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use radar_input::{parse_anchor, silence_hdf5_errors, RadarInputConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use summary::WindowSummary;

#[derive(Parser, Debug)]
#[command(name = "radar-loader")]
#[command(about = "Assemble a window of radar grids into nowcasting model input")]
struct Args {
    /// Anchor (most recent) observation time, e.g. 2024-01-15T12:00:00Z
    #[arg(short, long)]
    time: String,

    /// YAML configuration file (default: environment variables)
    #[arg(short, long, env = "RADAR_CONFIG")]
    config: Option<PathBuf>,

    /// Override the radar data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the number of input timesteps
    #[arg(long)]
    steps: Option<usize>,

    /// Only print the resolved paths; no files are read
    #[arg(long)]
    paths_only: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    silence_hdf5_errors();

    let config = load_config(&args)?;
    info!(
        data_dir = %config.data_dir.display(),
        input_steps = config.input_steps,
        timestep_minutes = config.timestep_minutes,
        zoom_factor = config.zoom_factor,
        "Loaded configuration"
    );

    let anchor = parse_anchor(&args.time)?;
    let paths = config.resolver().resolve_paths(anchor);

    if args.paths_only {
        println!("{}", serde_json::to_string_pretty(&paths)?);
        return Ok(());
    }

    let input = config
        .assembler()
        .load_and_assemble(&paths)
        .with_context(|| format!("failed to assemble window ending at {}", anchor))?;

    let summary = WindowSummary::new(anchor, paths, &input);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

fn load_config(args: &Args) -> Result<RadarInputConfig> {
    let mut config = match &args.config {
        Some(path) => RadarInputConfig::from_yaml_file(path)?,
        None => RadarInputConfig::from_env(),
    };

    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.clone();
    }

    if let Some(steps) = args.steps {
        config.input_steps = steps;
    }

    config.validate().context("invalid radar input configuration")?;
    Ok(config)
}
