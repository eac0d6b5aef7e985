// All tunable simulation constants in one place.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FlapError;

// Window / world
pub const WINDOW_WIDTH: f32 = 500.0;
pub const WINDOW_HEIGHT: f32 = 800.0;
pub const GROUND_Y: f32 = 730.0;

// Agent
pub const AGENT_START_X: f32 = 230.0;
pub const AGENT_START_Y: f32 = 350.0;
pub const JUMP_VELOCITY: f32 = -10.5;
pub const GRAVITY_TERM: f32 = 1.5;
pub const TERMINAL_DISPLACEMENT: f32 = 16.0;
pub const RISE_BOOST: f32 = 2.0;
pub const TILT_HOLD_MARGIN: f32 = 50.0;
pub const MAX_TILT: f32 = 25.0;
pub const MIN_TILT: f32 = -90.0;
pub const TILT_RATE: f32 = 20.0;

// Obstacles
pub const GAP_SIZE: f32 = 200.0;
pub const GAP_MIN: i32 = 50;
pub const GAP_MAX: i32 = 450;
pub const OBSTACLE_SPEED: f32 = 5.0;
pub const OSCILLATION_SPEED: f32 = 2.0;
pub const FIRST_OBSTACLE_X: f32 = 700.0;
pub const NEXT_OBSTACLE_X: f32 = 600.0;

// Sprites (pixel sizes of the generated silhouettes)
pub const AGENT_SPRITE_WIDTH: usize = 68;
pub const AGENT_SPRITE_HEIGHT: usize = 48;
pub const OBSTACLE_SPRITE_WIDTH: usize = 104;
pub const OBSTACLE_SPRITE_HEIGHT: usize = 640;
pub const OBSTACLE_LIP_HEIGHT: usize = 52;
pub const OBSTACLE_BODY_INSET: usize = 4;

// Fitness
pub const SURVIVAL_REWARD: f32 = 0.1;
pub const PASS_REWARD: f32 = 5.0;
pub const COLLISION_PENALTY: f32 = 1.0;
pub const JUMP_THRESHOLD: f32 = 0.5;

// Policy network
pub const POLICY_INPUTS: usize = 3;

// Presentation
pub const ANIMATION_TICKS: u64 = 5;
pub const GROUND_SCROLL_SPEED: f32 = 5.0;
pub const DIVE_FRAME_TILT: f32 = -80.0;

/// Runtime settings. Every field has a default so a partial JSON file is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,
    pub population_size: usize,
    /// Gap oscillation ("hard mode"). Fixed for the lifetime of a generation.
    pub oscillation: bool,
    pub tick_rate: u32,
    pub hidden_neurons: usize,
    pub mutation_rate: f32,
    pub mutation_sigma: f32,
    pub elite_fraction: f32,
    pub max_generations: Option<u32>,
    pub max_ticks_per_generation: Option<u64>,
    pub fitness_threshold: Option<f32>,
    pub high_score_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            population_size: 50,
            oscillation: false,
            tick_rate: 30,
            hidden_neurons: 4,
            mutation_rate: 0.1,
            mutation_sigma: 0.15,
            elite_fraction: 0.2,
            max_generations: None,
            max_ticks_per_generation: Some(30 * 60 * 5),
            fitness_threshold: Some(1000.0),
            high_score_path: PathBuf::from("high_score.txt"),
        }
    }
}

impl SimConfig {
    pub fn load(path: &Path) -> Result<Self, FlapError> {
        let text = std::fs::read_to_string(path).map_err(|source| FlapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SimConfig = serde_json::from_str(&text).map_err(|source| FlapError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FlapError> {
        if self.population_size == 0 {
            return Err(FlapError::InvalidConfig(
                "population_size must be > 0".to_string(),
            ));
        }
        if self.tick_rate == 0 {
            return Err(FlapError::InvalidConfig("tick_rate must be > 0".to_string()));
        }
        if self.hidden_neurons == 0 {
            return Err(FlapError::InvalidConfig(
                "hidden_neurons must be > 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(FlapError::InvalidConfig(format!(
                "mutation_rate {} outside [0, 1]",
                self.mutation_rate
            )));
        }
        if !(self.elite_fraction > 0.0 && self.elite_fraction <= 1.0) {
            return Err(FlapError::InvalidConfig(format!(
                "elite_fraction {} outside (0, 1]",
                self.elite_fraction
            )));
        }
        if self.max_ticks_per_generation == Some(0) {
            return Err(FlapError::InvalidConfig(
                "max_ticks_per_generation must be > 0 when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fixed_dt(&self) -> f64 {
        1.0 / self.tick_rate as f64
    }
}
