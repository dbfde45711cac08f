//! Schelling Sim - Entry Point
//!
//! Builds a board from a TOML config and/or flags, runs the selected
//! relocation policy, and writes the frames and statistics as JSON for an
//! external renderer.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use schelling_sim::core::error::Result;
use schelling_sim::simulation::output::DEFAULT_PLAYBACK_FRAMES;
use schelling_sim::{simulate, RelocationPolicy, SimulationConfig};

/// Schelling segregation simulation
#[derive(Parser, Debug)]
#[command(name = "schelling-sim")]
#[command(about = "Run a Schelling segregation model and export its frames as JSON")]
struct Args {
    /// TOML config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board side length in cells
    #[arg(long)]
    side: Option<usize>,

    /// Fraction of empty cells
    #[arg(long)]
    empty: Option<f64>,

    /// Fraction of occupied cells that are red (TypeA)
    #[arg(long)]
    type_a: Option<f64>,

    /// Satisfaction threshold in [0, 1]
    #[arg(long)]
    threshold: Option<f64>,

    /// Stopping floor for closest-search policies
    #[arg(long)]
    stopping: Option<usize>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of external steps
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Relocation policy identifier (see --list-policies)
    #[arg(long)]
    policy: Option<String>,

    /// Approximate number of frames to keep for playback
    #[arg(long, default_value_t = DEFAULT_PLAYBACK_FRAMES)]
    frames: usize,

    /// Exact frame stride; overrides --frames
    #[arg(long)]
    frame_jump: Option<usize>,

    /// Where to write the JSON output
    #[arg(long, default_value = "simulation_output.json")]
    output: PathBuf,

    /// Print the available policy identifiers and exit
    #[arg(long)]
    list_policies: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("schelling_sim=info")),
        )
        .init();

    let args = Args::parse();

    if args.list_policies {
        for policy in RelocationPolicy::all() {
            println!("{}", policy);
        }
        return Ok(());
    }

    let config = build_config(&args)?;
    config.validate()?;

    println!("Schelling Segregation Simulation");
    println!("================================");
    println!(
        "Board: {0}x{0}, {1:.0}% empty, {2:.0}% of residents red",
        config.side_length,
        config.empty_fraction * 100.0,
        config.type_a_fraction * 100.0
    );
    println!(
        "Policy: {}, threshold {}, up to {} steps (seed {})",
        config.policy, config.threshold, config.max_iterations, config.seed
    );
    println!();

    let mut output = simulate(&config)?;
    println!("{}", output.summary());

    output.retain_playback_frames(args.frames, args.frame_jump);
    std::fs::write(&args.output, output.to_json()?)?;
    println!(
        "\n{} playback frames written to {}",
        output.frames.len(),
        args.output.display()
    );

    Ok(())
}

/// Config file (or defaults) with command-line overrides applied
fn build_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(side) = args.side {
        config.side_length = side;
    }
    if let Some(empty) = args.empty {
        config.empty_fraction = empty;
    }
    if let Some(type_a) = args.type_a {
        config.type_a_fraction = type_a;
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(stopping) = args.stopping {
        config.stopping_floor = stopping;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.max_iterations = max_iterations;
    }
    if let Some(policy) = &args.policy {
        config.policy = policy.clone();
    }

    Ok(config)
}
