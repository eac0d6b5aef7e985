use ::rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config;

/// Decoded weights and biases span [-WEIGHT_RANGE, WEIGHT_RANGE].
pub const WEIGHT_RANGE: f32 = 8.0;

/// Flat parameter vector of a 3 -> H -> 1 feed-forward policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    /// Raw genome values, all normalized to [0, 1].
    /// Layout: [hidden weights: H*3] [hidden biases: H] [output weights: H] [output bias: 1]
    pub genes: Vec<f32>,
    pub hidden: usize,
}

impl Genome {
    pub fn gene_len(hidden: usize) -> usize {
        hidden * config::POLICY_INPUTS + hidden + hidden + 1
    }

    pub fn random(hidden: usize, rng: &mut impl Rng) -> Self {
        let genes = (0..Self::gene_len(hidden))
            .map(|_| rng.gen_range(0.0..1.0))
            .collect();
        Self { genes, hidden }
    }

    /// Mutate this genome, returning a new child genome.
    pub fn mutate(&self, rate: f32, sigma: f32, rng: &mut impl Rng) -> Self {
        let mut child = self.clone();
        if sigma <= 0.0 {
            return child;
        }
        for gene in &mut child.genes {
            if rng.gen::<f32>() < rate {
                *gene += rng.gen_range(-sigma..sigma);
                *gene = gene.clamp(0.0, 1.0);
            }
        }
        child
    }

    pub fn is_well_formed(&self) -> bool {
        self.hidden > 0 && self.genes.len() == Self::gene_len(self.hidden)
    }

    fn decode(&self, idx: usize) -> f32 {
        (self.genes[idx] - 0.5) * 2.0 * WEIGHT_RANGE
    }

    /// Weight from input `input` into hidden neuron `h`.
    pub fn hidden_weight(&self, h: usize, input: usize) -> f32 {
        self.decode(h * config::POLICY_INPUTS + input)
    }

    pub fn hidden_bias(&self, h: usize) -> f32 {
        self.decode(self.hidden * config::POLICY_INPUTS + h)
    }

    pub fn output_weight(&self, h: usize) -> f32 {
        self.decode(self.hidden * (config::POLICY_INPUTS + 1) + h)
    }

    pub fn output_bias(&self) -> f32 {
        self.decode(self.genes.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn decoding_maps_gene_extremes_to_weight_range() {
        let hidden = 2;
        let mut genome = Genome {
            genes: vec![0.5; Genome::gene_len(hidden)],
            hidden,
        };
        genome.genes[0] = 0.0;
        *genome.genes.last_mut().unwrap() = 1.0;

        assert_eq!(genome.hidden_weight(0, 0), -WEIGHT_RANGE);
        assert_eq!(genome.output_bias(), WEIGHT_RANGE);
        assert_eq!(genome.hidden_bias(1), 0.0);
        assert!(genome.is_well_formed());
    }

    #[test]
    fn mutation_keeps_genes_normalized_and_length_stable() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let parent = Genome::random(4, &mut rng);
        let child = parent.mutate(1.0, 0.9, &mut rng);

        assert_eq!(child.genes.len(), parent.genes.len());
        assert!(child.genes.iter().all(|g| (0.0..=1.0).contains(g)));
        assert_ne!(child, parent);
        assert_eq!(parent.mutate(0.0, 0.5, &mut rng), parent);
    }
}
