use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SimConfig;
use crate::error::FlapError;
use crate::evolution::NeuroEvolution;
use crate::genome::Genome;

const CHECKPOINT_VERSION: u32 = 1;

/// On-disk optimizer state between generations.
#[derive(Clone, Serialize, Deserialize)]
struct CheckpointV1 {
    version: u32,
    seed: u64,
    generation: u32,
    hidden: usize,
    genomes: Vec<Genome>,
}

impl CheckpointV1 {
    fn from_evolution(evo: &NeuroEvolution, seed: u64) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            seed,
            generation: evo.generation,
            hidden: evo.hidden,
            genomes: evo.genomes.clone(),
        }
    }

    fn restore(self, config: &SimConfig) -> Result<NeuroEvolution, FlapError> {
        if self.genomes.is_empty() {
            return Err(FlapError::Checkpoint("checkpoint holds no genomes".into()));
        }
        if self.generation == 0 {
            return Err(FlapError::Checkpoint("generation numbers start at 1".into()));
        }
        if let Some((i, _)) = self
            .genomes
            .iter()
            .enumerate()
            .find(|(_, g)| g.hidden != self.hidden || !g.is_well_formed())
        {
            return Err(FlapError::Checkpoint(format!(
                "genome {i} does not match a {}-neuron hidden layer",
                self.hidden
            )));
        }
        if self.seed != config.seed {
            warn!(
                saved = self.seed,
                configured = config.seed,
                "checkpoint seed differs from configured seed; using configured seed"
            );
        }
        Ok(NeuroEvolution::from_parts(
            config,
            self.genomes,
            self.generation,
        ))
    }
}

/// Save the optimizer population to a file.
pub fn save_checkpoint(evo: &NeuroEvolution, seed: u64, path: &Path) -> Result<(), FlapError> {
    let state = CheckpointV1::from_evolution(evo, seed);
    let bytes = bincode::serialize(&state)
        .map_err(|e| FlapError::Checkpoint(format!("serialize error: {e}")))?;
    std::fs::write(path, bytes).map_err(|source| FlapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), generation = evo.generation, "checkpoint saved");
    Ok(())
}

/// Load an optimizer population. The configured mutation parameters apply to the restored run.
pub fn load_checkpoint(path: &Path, config: &SimConfig) -> Result<NeuroEvolution, FlapError> {
    let bytes = std::fs::read(path).map_err(|source| FlapError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let state: CheckpointV1 = bincode::deserialize(&bytes)
        .map_err(|e| FlapError::Checkpoint(format!("not a valid checkpoint ({e})")))?;
    if state.version != CHECKPOINT_VERSION {
        return Err(FlapError::Checkpoint(format!(
            "unsupported checkpoint version {}",
            state.version
        )));
    }

    let evo = state.restore(config)?;
    info!(path = %path.display(), generation = evo.generation, "checkpoint loaded");
    Ok(evo)
}
