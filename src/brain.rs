use crate::config;
use crate::genome::Genome;

/// Decision function: (height, distance to gap top, distance to gap bottom) -> scalar.
/// Outputs above `config::JUMP_THRESHOLD` trigger a jump.
pub trait Policy {
    fn activate(&self, inputs: [f32; config::POLICY_INPUTS]) -> f32;
}

impl<F> Policy for F
where
    F: Fn([f32; config::POLICY_INPUTS]) -> f32,
{
    fn activate(&self, inputs: [f32; config::POLICY_INPUTS]) -> f32 {
        self(inputs)
    }
}

/// One policy under evaluation together with the fitness the simulation accumulates for it.
pub struct Candidate {
    pub policy: Box<dyn Policy>,
    pub fitness: f32,
}

impl Candidate {
    pub fn new(policy: Box<dyn Policy>) -> Self {
        Self {
            policy,
            fitness: 0.0,
        }
    }
}

/// Map a raw policy output to a jump decision. Non-finite outputs never jump.
pub fn wants_jump(output: f32) -> bool {
    output.is_finite() && output > config::JUMP_THRESHOLD
}

/// Fixed-topology 3 -> H -> 1 network with tanh activations.
#[derive(Clone, Debug)]
pub struct FeedForwardNet {
    hidden_weights: Vec<[f32; config::POLICY_INPUTS]>,
    hidden_biases: Vec<f32>,
    output_weights: Vec<f32>,
    output_bias: f32,
}

/// Raw inputs are screen-space pixels; bring them near unit scale.
const INPUT_SCALE: f32 = 1.0 / config::WINDOW_HEIGHT;

impl FeedForwardNet {
    pub fn from_genome(genome: &Genome) -> Self {
        let h = genome.hidden;
        let hidden_weights = (0..h)
            .map(|i| {
                let mut row = [0.0; config::POLICY_INPUTS];
                for (input, w) in row.iter_mut().enumerate() {
                    *w = genome.hidden_weight(i, input);
                }
                row
            })
            .collect();

        Self {
            hidden_weights,
            hidden_biases: (0..h).map(|i| genome.hidden_bias(i)).collect(),
            output_weights: (0..h).map(|i| genome.output_weight(i)).collect(),
            output_bias: genome.output_bias(),
        }
    }

}

impl Policy for FeedForwardNet {
    fn activate(&self, inputs: [f32; config::POLICY_INPUTS]) -> f32 {
        let mut sum = self.output_bias;
        for ((row, bias), out_w) in self
            .hidden_weights
            .iter()
            .zip(&self.hidden_biases)
            .zip(&self.output_weights)
        {
            let mut pre = *bias;
            for (w, x) in row.iter().zip(inputs.iter()) {
                pre += w * x * INPUT_SCALE;
            }
            sum += out_w * pre.tanh();
        }
        sum.tanh()
    }
}
