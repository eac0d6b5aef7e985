use ::rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::brain::{Candidate, FeedForwardNet};
use crate::config::SimConfig;
use crate::genome::Genome;
use crate::reporting::{MetricAggregator, MetricSummary};

/// Stream offset so the optimizer's RNG never mirrors the obstacle course RNG.
const OPTIMIZER_STREAM: u64 = 0x5eed_0f_9e11;

/// Minimal optimizer collaborator: elitism plus mutation, no crossover or speciation.
pub struct NeuroEvolution {
    pub genomes: Vec<Genome>,
    /// Number of the generation the current genomes belong to (1-based).
    pub generation: u32,
    pub hidden: usize,
    pub mutation_rate: f32,
    pub mutation_sigma: f32,
    pub elite_fraction: f32,
    rng: ChaCha8Rng,
}

/// Result of one evaluated generation, as reported back to the operator.
#[derive(Clone, Debug)]
pub struct GenerationSummary {
    pub generation: u32,
    pub best_fitness: f32,
    pub best_index: usize,
    pub fitness: MetricSummary,
}

impl NeuroEvolution {
    pub fn new(config: &SimConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed ^ OPTIMIZER_STREAM);
        let genomes = (0..config.population_size)
            .map(|_| Genome::random(config.hidden_neurons, &mut rng))
            .collect();
        Self {
            genomes,
            generation: 1,
            hidden: config.hidden_neurons,
            mutation_rate: config.mutation_rate,
            mutation_sigma: config.mutation_sigma,
            elite_fraction: config.elite_fraction,
            rng,
        }
    }

    /// Resume from saved genomes. The RNG is re-derived from seed and generation.
    pub fn from_parts(config: &SimConfig, genomes: Vec<Genome>, generation: u32) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(
            (config.seed ^ OPTIMIZER_STREAM).wrapping_add(generation as u64),
        );
        let hidden = genomes
            .first()
            .map_or(config.hidden_neurons, |g| g.hidden);
        Self {
            genomes,
            generation,
            hidden,
            mutation_rate: config.mutation_rate,
            mutation_sigma: config.mutation_sigma,
            elite_fraction: config.elite_fraction,
            rng,
        }
    }

    /// Fresh candidates for the current generation, fitness zeroed.
    pub fn candidates(&self) -> Vec<Candidate> {
        self.genomes
            .iter()
            .map(|g| Candidate::new(Box::new(FeedForwardNet::from_genome(g))))
            .collect()
    }

    /// Consume evaluated fitness and breed the next generation.
    pub fn advance(&mut self, candidates: &[Candidate]) -> GenerationSummary {
        let fitness: Vec<f32> = candidates.iter().map(|c| c.fitness).collect();
        let summary = summarize(self.generation, &fitness);

        info!(
            generation = summary.generation,
            best = summary.best_fitness,
            best_index = summary.best_index,
            mean = summary.fitness.mean,
            "generation evaluated"
        );

        self.genomes = self.next_genomes(&fitness);
        self.generation += 1;
        summary
    }

    fn next_genomes(&mut self, fitness: &[f32]) -> Vec<Genome> {
        let n = self.genomes.len();
        if n == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<usize> = (0..n).collect();
        ranked.sort_by(|&a, &b| {
            let fa = fitness.get(a).copied().unwrap_or(f32::NEG_INFINITY);
            let fb = fitness.get(b).copied().unwrap_or(f32::NEG_INFINITY);
            fb.total_cmp(&fa)
        });

        let elite_count = ((n as f32 * self.elite_fraction).ceil() as usize).clamp(1, n);
        let elites: Vec<Genome> = ranked[..elite_count]
            .iter()
            .map(|&i| self.genomes[i].clone())
            .collect();

        let mut next = elites.clone();
        while next.len() < n {
            let parent = &elites[self.rng.gen_range(0..elite_count)];
            next.push(parent.mutate(self.mutation_rate, self.mutation_sigma, &mut self.rng));
        }
        next
    }
}

fn summarize(generation: u32, fitness: &[f32]) -> GenerationSummary {
    let mut agg = MetricAggregator::new();
    let mut best_index = 0;
    let mut best_fitness = f32::NEG_INFINITY;
    for (i, &f) in fitness.iter().enumerate() {
        agg.push(f as f64);
        if f > best_fitness {
            best_fitness = f;
            best_index = i;
        }
    }
    if fitness.is_empty() {
        best_fitness = 0.0;
    }
    GenerationSummary {
        generation,
        best_fitness,
        best_index,
        fitness: agg.summary(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimConfig {
        SimConfig {
            population_size: 10,
            elite_fraction: 0.2,
            ..SimConfig::default()
        }
    }

    #[test]
    fn candidates_match_population_with_zero_fitness() {
        let evo = NeuroEvolution::new(&small_config());
        let candidates = evo.candidates();
        assert_eq!(candidates.len(), 10);
        assert!(candidates.iter().all(|c| c.fitness == 0.0));
    }

    #[test]
    fn advance_keeps_elites_and_population_size() {
        let mut evo = NeuroEvolution::new(&small_config());
        let mut candidates = evo.candidates();
        for (i, c) in candidates.iter_mut().enumerate() {
            c.fitness = i as f32;
        }
        let best = evo.genomes[9].clone();
        let second = evo.genomes[8].clone();

        let summary = evo.advance(&candidates);
        assert_eq!(summary.generation, 1);
        assert_eq!(summary.best_index, 9);
        assert_eq!(summary.best_fitness, 9.0);
        assert!((summary.fitness.mean - 4.5).abs() < 1e-9);

        assert_eq!(evo.generation, 2);
        assert_eq!(evo.genomes.len(), 10);
        assert_eq!(evo.genomes[0], best);
        assert_eq!(evo.genomes[1], second);
    }

    #[test]
    fn same_seed_breeds_same_lineage() {
        let run = || {
            let mut evo = NeuroEvolution::new(&small_config());
            let mut candidates = evo.candidates();
            for (i, c) in candidates.iter_mut().enumerate() {
                c.fitness = (i % 3) as f32;
            }
            evo.advance(&candidates);
            evo.genomes
        };
        assert_eq!(run(), run());
    }
}
