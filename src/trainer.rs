use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::brain::Candidate;
use crate::config::SimConfig;
use crate::error::FlapError;
use crate::evolution::{GenerationSummary, NeuroEvolution};
use crate::reporting::{GenerationRecord, RunReport};
use crate::save_load;
use crate::simulation::{
    ControlMode, GenerationContext, GenerationOutcome, SimState, TickInput, TickStatus,
};
use crate::sprites::SpriteSet;
use crate::stats::EvolutionStats;

/// Whether the tick budget for a generation is spent.
pub fn tick_budget_spent(config: &SimConfig, ticks: u64) -> bool {
    config.max_ticks_per_generation.is_some_and(|max| ticks >= max)
}

/// Run every candidate through one generation without rendering.
pub fn evaluate_generation(
    config: &SimConfig,
    generation: u32,
    sprites: &Arc<SpriteSet>,
    candidates: &mut [Candidate],
) -> GenerationOutcome {
    let context = GenerationContext::new(config, generation);
    let mut sim = SimState::new(context, ControlMode::Evolution, Arc::clone(sprites));
    loop {
        let input = TickInput {
            jump_pressed: false,
            stop_requested: tick_budget_spent(config, sim.tick_count),
        };
        if let TickStatus::Finished(outcome) = sim.tick(&input, candidates) {
            return outcome;
        }
    }
}

/// Hand a finished generation's fitness to the optimizer and record it for the graph.
/// Applies to stopped generations too: fitness up to the last completed tick counts.
pub fn conclude_generation(
    evo: &mut NeuroEvolution,
    candidates: &[Candidate],
    outcome: &GenerationOutcome,
    stats: &mut EvolutionStats,
) -> GenerationSummary {
    let summary = evo.advance(candidates);
    stats.record(
        summary.best_fitness,
        summary.fitness.mean as f32,
        outcome.score,
    );
    summary
}

pub fn threshold_reached(config: &SimConfig, best_fitness: f32) -> bool {
    config
        .fitness_threshold
        .is_some_and(|threshold| best_fitness >= threshold)
}

/// Headless training loop: evaluate, report, breed, optionally checkpoint.
pub fn run_headless(
    config: &SimConfig,
    evo: &mut NeuroEvolution,
    checkpoint: Option<&Path>,
) -> Result<RunReport, FlapError> {
    let sprites = Arc::new(SpriteSet::generate());
    let mut report = RunReport::new(config.seed, config.population_size, config.oscillation);
    let mut stats = EvolutionStats::new(256);
    let first_generation = evo.generation;

    loop {
        let mut candidates = evo.candidates();
        let outcome = evaluate_generation(config, evo.generation, &sprites, &mut candidates);
        let summary = conclude_generation(evo, &candidates, &outcome, &mut stats);
        report.push(GenerationRecord::new(
            &outcome,
            summary.best_fitness,
            summary.fitness.clone(),
        ));

        debug!(
            generation = outcome.generation,
            p50 = summary.fitness.p50,
            p90 = summary.fitness.p90,
            "fitness distribution"
        );

        if let Some(path) = checkpoint {
            save_load::save_checkpoint(evo, config.seed, path)?;
        }

        if threshold_reached(config, summary.best_fitness) {
            info!(
                generation = outcome.generation,
                best = summary.best_fitness,
                "fitness threshold reached"
            );
            report.threshold_reached = true;
            break;
        }

        let completed = evo.generation - first_generation;
        if config.max_generations.is_some_and(|max| completed >= max) {
            break;
        }
    }

    info!(
        generations = report.generations.len(),
        best_fitness = report.best_fitness,
        best_score = report.best_score,
        "training finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::EndReason;

    fn config() -> SimConfig {
        SimConfig {
            seed: 5,
            population_size: 6,
            max_generations: Some(3),
            max_ticks_per_generation: Some(60),
            fitness_threshold: None,
            ..SimConfig::default()
        }
    }

    #[test]
    fn tick_budget_raises_the_stop_signal() {
        let cfg = SimConfig {
            max_ticks_per_generation: Some(10),
            ..config()
        };
        let sprites = Arc::new(SpriteSet::generate());
        let always_jump = || Candidate::new(Box::new(|_: [f32; 3]| 1.0f32));
        let mut candidates = vec![always_jump(), always_jump()];
        candidates[0].fitness = 99.0;

        let outcome = evaluate_generation(&cfg, 1, &sprites, &mut candidates);
        assert!(outcome.ticks <= 10);
        assert!(candidates.iter().all(|c| c.fitness < 99.0));
    }

    #[test]
    fn stopped_generation_still_reaches_optimizer_and_graph() {
        let cfg = config();
        let sprites = Arc::new(SpriteSet::generate());
        let mut evo = NeuroEvolution::new(&cfg);
        let mut stats = EvolutionStats::new(8);
        let mut candidates = evo.candidates();

        let mut sim = SimState::new(
            GenerationContext::new(&cfg, evo.generation),
            ControlMode::Evolution,
            Arc::clone(&sprites),
        );
        for _ in 0..4 {
            sim.tick(&TickInput::default(), &mut candidates);
        }
        let stop = TickInput {
            stop_requested: true,
            ..Default::default()
        };
        let outcome = match sim.tick(&stop, &mut candidates) {
            TickStatus::Finished(outcome) => outcome,
            TickStatus::Running => panic!("expected generation to finish"),
        };
        assert_eq!(outcome.reason, EndReason::StopRequested);

        let summary = conclude_generation(&mut evo, &candidates, &outcome, &mut stats);
        assert_eq!(summary.generation, 1);
        assert_eq!(evo.generation, 2);
        assert_eq!(stats.best_fitness.len(), 1);
        assert!((summary.best_fitness - 0.4).abs() < 1e-5);
    }

    #[test]
    fn headless_run_stops_after_configured_generations() {
        let cfg = config();
        let mut evo = NeuroEvolution::new(&cfg);
        let report = run_headless(&cfg, &mut evo, None).unwrap();

        assert_eq!(report.generations.len(), 3);
        assert_eq!(evo.generation, 4);
        assert!(!report.threshold_reached);
        let numbers: Vec<u32> = report.generations.iter().map(|g| g.generation).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(report.generations.iter().all(|g| g.ticks <= 60));
    }

    #[test]
    fn threshold_ends_the_run_early() {
        let cfg = SimConfig {
            fitness_threshold: Some(-100.0),
            ..config()
        };
        let mut evo = NeuroEvolution::new(&cfg);
        let report = run_headless(&cfg, &mut evo, None).unwrap();
        assert_eq!(report.generations.len(), 1);
        assert!(report.threshold_reached);
    }

    #[test]
    fn same_seed_gives_same_report_and_checkpoint_resumes() {
        let cfg = config();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.bin");

        let mut a = NeuroEvolution::new(&cfg);
        let ra = run_headless(&cfg, &mut a, Some(&path)).unwrap();
        let mut b = NeuroEvolution::new(&cfg);
        let rb = run_headless(&cfg, &mut b, None).unwrap();

        let best = |r: &RunReport| r.generations.iter().map(|g| g.best_fitness).collect::<Vec<_>>();
        assert_eq!(best(&ra), best(&rb));

        let resumed = save_load::load_checkpoint(&path, &cfg).unwrap();
        assert_eq!(resumed.generation, a.generation);
        assert_eq!(resumed.genomes, a.genomes);
    }
}
