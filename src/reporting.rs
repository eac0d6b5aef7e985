use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FlapError;
use crate::simulation::{EndReason, GenerationOutcome};

/// Distribution of one generation's fitness values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

#[derive(Debug, Clone, Default)]
pub struct MetricAggregator {
    samples: Vec<f64>,
    sum: f64,
}

impl MetricAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.samples.push(value);
    }

    pub fn summary(&self) -> MetricSummary {
        if self.samples.is_empty() {
            return MetricSummary::default();
        }

        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len() as f64;
        let mean = self.sum / n;
        let variance = sorted.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

        MetricSummary {
            count: sorted.len(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean,
            std_dev: variance.sqrt(),
            p25: percentile_nearest_rank(&sorted, 0.25),
            p50: percentile_nearest_rank(&sorted, 0.50),
            p75: percentile_nearest_rank(&sorted, 0.75),
            p90: percentile_nearest_rank(&sorted, 0.90),
        }
    }
}

fn percentile_nearest_rank(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let p = p.clamp(0.0, 1.0);
    let rank = ((p * sorted.len() as f64).ceil() as usize).saturating_sub(1);
    sorted[rank.min(sorted.len() - 1)]
}

/// One line of the run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: u32,
    pub score: u32,
    pub ticks: u64,
    pub stopped: bool,
    pub best_fitness: f32,
    pub fitness: MetricSummary,
}

impl GenerationRecord {
    pub fn new(outcome: &GenerationOutcome, best_fitness: f32, fitness: MetricSummary) -> Self {
        Self {
            generation: outcome.generation,
            score: outcome.score,
            ticks: outcome.ticks,
            stopped: outcome.reason == EndReason::StopRequested,
            best_fitness,
            fitness,
        }
    }
}

/// Headless training report, written as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: u64,
    pub population_size: usize,
    pub oscillation: bool,
    pub generations: Vec<GenerationRecord>,
    pub best_fitness: f32,
    pub best_score: u32,
    pub threshold_reached: bool,
}

impl RunReport {
    pub fn new(seed: u64, population_size: usize, oscillation: bool) -> Self {
        Self {
            seed,
            population_size,
            oscillation,
            generations: Vec::new(),
            best_fitness: 0.0,
            best_score: 0,
            threshold_reached: false,
        }
    }

    pub fn push(&mut self, record: GenerationRecord) {
        if self.generations.is_empty() || record.best_fitness > self.best_fitness {
            self.best_fitness = record.best_fitness;
        }
        self.best_score = self.best_score.max(record.score);
        self.generations.push(record);
    }

    pub fn write_json(&self, path: &Path) -> Result<(), FlapError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| FlapError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
