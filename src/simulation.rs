use std::sync::Arc;

use ::rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use crate::agent::{Agent, AgentArena, DecisionSource};
use crate::brain::{self, Candidate};
use crate::collision;
use crate::config::{self, SimConfig};
use crate::obstacle::Obstacle;
use crate::physics;
use crate::scoring;
use crate::sprites::SpriteSet;

/// Who controls the agents of a generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlMode {
    /// One agent driven by the operator's jump events.
    Manual,
    /// One agent per candidate supplied by the optimizer.
    Evolution,
}

/// Explicit per-generation context; replaces ambient counters and flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationContext {
    pub generation: u32,
    pub seed: u64,
    pub oscillation: bool,
}

impl GenerationContext {
    pub fn new(config: &SimConfig, generation: u32) -> Self {
        Self {
            generation,
            seed: config.seed,
            oscillation: config.oscillation,
        }
    }

    /// Obstacle RNG seed: every policy of one generation sees the same course.
    pub fn obstacle_seed(&self) -> u64 {
        self.seed.wrapping_add(self.generation as u64)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationPhase {
    Initializing,
    Running,
    AgentsDepleted,
    StopRequested,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    AgentsDepleted,
    StopRequested,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationOutcome {
    pub generation: u32,
    pub reason: EndReason,
    pub score: u32,
    pub ticks: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickStatus {
    Running,
    Finished(GenerationOutcome),
}

/// External events observed once per tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickInput {
    pub jump_pressed: bool,
    pub stop_requested: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentView {
    pub x: f32,
    pub y: f32,
    pub prev_y: f32,
    pub tilt: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleView {
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Read-only state handed to the renderer after each tick.
#[derive(Clone, Debug, Default)]
pub struct FrameSnapshot {
    pub agents: Vec<AgentView>,
    pub obstacles: Vec<ObstacleView>,
    pub tick: u64,
}

/// Population controller: owns agents and obstacles for one generation.
pub struct SimState {
    pub arena: AgentArena,
    pub obstacles: Vec<Obstacle>,
    pub sprites: Arc<SpriteSet>,
    pub context: GenerationContext,
    pub mode: ControlMode,
    pub rng: ChaCha8Rng,
    pub score: u32,
    pub tick_count: u64,
    phase: GenerationPhase,
    outcome: Option<GenerationOutcome>,
}

impl SimState {
    pub fn new(context: GenerationContext, mode: ControlMode, sprites: Arc<SpriteSet>) -> Self {
        Self {
            arena: AgentArena::new(0),
            obstacles: Vec::new(),
            sprites,
            rng: ChaCha8Rng::seed_from_u64(context.obstacle_seed()),
            context,
            mode,
            score: 0,
            tick_count: 0,
            phase: GenerationPhase::Initializing,
            outcome: None,
        }
    }

    pub fn alive_count(&self) -> usize {
        self.arena.count
    }

    /// Allocate agents and the first obstacle. No-op once past `Initializing`.
    pub fn initialize(&mut self, candidates: &mut [Candidate]) {
        if self.phase != GenerationPhase::Initializing {
            return;
        }

        match self.mode {
            ControlMode::Manual => {
                self.arena = AgentArena::new(1);
                self.arena.spawn(Agent::new(DecisionSource::Human));
            }
            ControlMode::Evolution => {
                self.arena = AgentArena::new(candidates.len());
                for (slot, candidate) in candidates.iter_mut().enumerate() {
                    candidate.fitness = 0.0;
                    self.arena.spawn(Agent::new(DecisionSource::Policy(slot)));
                }
            }
        }

        self.obstacles.clear();
        self.obstacles
            .push(Obstacle::spawn(config::FIRST_OBSTACLE_X, &mut self.rng));
        self.score = 0;
        self.tick_count = 0;
        self.phase = GenerationPhase::Running;

        info!(
            generation = self.context.generation,
            agents = self.arena.count,
            oscillation = self.context.oscillation,
            "generation started"
        );

        if self.arena.is_empty() {
            self.phase = GenerationPhase::AgentsDepleted;
        }
    }

    /// Advance one fixed-rate tick.
    pub fn tick(&mut self, input: &TickInput, candidates: &mut [Candidate]) -> TickStatus {
        if self.phase == GenerationPhase::Initializing {
            self.initialize(candidates);
        }

        match self.phase {
            GenerationPhase::Running => {}
            GenerationPhase::AgentsDepleted => return self.finish(EndReason::AgentsDepleted),
            GenerationPhase::StopRequested => return self.finish(EndReason::StopRequested),
            GenerationPhase::Done | GenerationPhase::Initializing => {
                return self.outcome.map_or(TickStatus::Running, TickStatus::Finished);
            }
        }

        if input.stop_requested {
            self.phase = GenerationPhase::StopRequested;
            return self.finish(EndReason::StopRequested);
        }

        self.step_agents(input, candidates);
        let passes = self.step_obstacles(candidates);

        if passes > 0 {
            self.score += passes;
            for _ in 0..passes {
                scoring::reward_pass(&self.arena, candidates);
            }
            self.obstacles
                .push(Obstacle::spawn(config::NEXT_OBSTACLE_X, &mut self.rng));
            debug!(score = self.score, alive = self.arena.count, "obstacle passed");
        }

        self.obstacles.retain(|o| !o.off_screen());
        if self.obstacles.is_empty() {
            self.obstacles
                .push(Obstacle::spawn(config::NEXT_OBSTACLE_X, &mut self.rng));
        }

        scoring::kill_out_of_bounds(&mut self.arena);
        let swept = self.arena.sweep_dead();
        if !swept.is_empty() {
            trace!(tick = self.tick_count, removed = swept.len(), "agents removed");
        }

        self.tick_count += 1;

        if self.arena.is_empty() {
            self.phase = GenerationPhase::AgentsDepleted;
            return self.finish(EndReason::AgentsDepleted);
        }
        TickStatus::Running
    }

    /// Index of the obstacle policies steer by: skip the first once the lead agent is past it.
    pub fn active_obstacle_index(&self) -> usize {
        debug_assert!(!self.obstacles.is_empty());
        match self.arena.lead() {
            Some(lead)
                if self.obstacles.len() > 1 && lead.x > self.obstacles[0].trailing_edge() =>
            {
                1
            }
            _ => 0,
        }
    }

    fn step_agents(&mut self, input: &TickInput, candidates: &mut [Candidate]) {
        let active = &self.obstacles[self.active_obstacle_index()];
        let (gap_top, gap_bottom) = (active.height, active.bottom);

        for agent in self.arena.iter_alive_mut() {
            let jump = match agent.source {
                DecisionSource::Human => input.jump_pressed,
                DecisionSource::Policy(slot) => candidates.get(slot).is_some_and(|c| {
                    let inputs = [
                        agent.y,
                        (agent.y - gap_top).abs(),
                        (agent.y - gap_bottom).abs(),
                    ];
                    brain::wants_jump(c.policy.activate(inputs))
                }),
            };
            if jump {
                physics::jump(agent);
            }
            scoring::reward_survival(agent, candidates);
            physics::advance(agent);
        }
    }

    /// Move every obstacle and resolve collisions and first passes against it.
    /// Returns how many obstacles were passed for the first time.
    fn step_obstacles(&mut self, candidates: &mut [Candidate]) -> u32 {
        let mut passes = 0;
        for obstacle in &mut self.obstacles {
            obstacle.advance(self.context.oscillation);

            for agent in self.arena.iter_alive_mut() {
                if collision::collides(agent, obstacle, &self.sprites) {
                    scoring::penalize_collision(agent, candidates);
                    continue;
                }
                if !obstacle.passed && obstacle.x < agent.x {
                    obstacle.passed = true;
                    passes += 1;
                }
            }
        }
        passes
    }

    fn finish(&mut self, reason: EndReason) -> TickStatus {
        let outcome = GenerationOutcome {
            generation: self.context.generation,
            reason,
            score: self.score,
            ticks: self.tick_count,
        };
        self.phase = GenerationPhase::Done;
        self.outcome = Some(outcome);
        info!(
            generation = outcome.generation,
            score = outcome.score,
            ticks = outcome.ticks,
            reason = ?outcome.reason,
            "generation finished"
        );
        TickStatus::Finished(outcome)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            agents: self
                .arena
                .iter_alive()
                .map(|(_, a)| AgentView {
                    x: a.x,
                    y: a.y,
                    prev_y: a.prev_y,
                    tilt: a.tilt,
                })
                .collect(),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    x: o.x,
                    top: o.top,
                    bottom: o.bottom,
                })
                .collect(),
            tick: self.tick_count,
        }
    }
}
