use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod agent;
mod app;
mod brain;
mod collision;
mod config;
mod error;
mod evolution;
mod genome;
mod highscore;
mod obstacle;
mod physics;
mod renderer;
mod reporting;
mod save_load;
mod scoring;
mod simulation;
mod sprites;
mod stats;
mod trainer;
mod ui;

use config::SimConfig;
use evolution::NeuroEvolution;

const DEFAULT_CHECKPOINT: &str = "flapgen_checkpoint.bin";

/// Side-scrolling flap simulation with a neuroevolution fitness harness.
#[derive(Parser, Debug)]
#[command(name = "flapgen", version, about)]
struct Cli {
    /// Train without opening a window.
    #[arg(long)]
    headless: bool,

    /// Stop after this many generations.
    #[arg(long)]
    generations: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Oscillating gaps.
    #[arg(long)]
    hard: bool,

    #[arg(long)]
    population: Option<usize>,

    /// JSON settings file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON run report here (headless only).
    #[arg(long)]
    report: Option<PathBuf>,

    /// Continue from a saved checkpoint.
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Checkpoint file written after every headless generation and by the Save button.
    #[arg(long)]
    checkpoint: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut SimConfig) {
        if let Some(generations) = self.generations {
            config.max_generations = Some(generations);
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.hard {
            config.oscillation = true;
        }
        if let Some(population) = self.population {
            config.population_size = population;
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flapgen=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => SimConfig::default(),
    };
    cli.apply(&mut config);
    config.validate().context("invalid settings after applying flags")?;

    if cli.headless {
        return run_headless(&cli, &config);
    }

    let checkpoint = cli
        .checkpoint
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CHECKPOINT));
    macroquad::Window::from_config(app::window_conf(), app::run(config, checkpoint, cli.resume));
    Ok(())
}

fn run_headless(cli: &Cli, config: &SimConfig) -> Result<()> {
    if config.max_generations.is_none() && config.fitness_threshold.is_none() {
        bail!("headless training needs --generations or a fitness_threshold to stop");
    }

    let mut evo = match &cli.resume {
        Some(path) => save_load::load_checkpoint(path, config)
            .with_context(|| format!("resuming from {}", path.display()))?,
        None => NeuroEvolution::new(config),
    };

    info!(
        seed = config.seed,
        population = evo.genomes.len(),
        oscillation = config.oscillation,
        start_generation = evo.generation,
        "headless training"
    );

    let report = trainer::run_headless(config, &mut evo, cli.checkpoint.as_deref())
        .context("training run failed")?;

    if let Some(path) = &cli.report {
        report
            .write_json(path)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}
