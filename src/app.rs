use std::path::{Path, PathBuf};
use std::sync::Arc;

use macroquad::prelude::*;
use tracing::{info, warn};

use crate::brain::Candidate;
use crate::config::{self, SimConfig};
use crate::evolution::NeuroEvolution;
use crate::highscore;
use crate::renderer::{self, RenderState, SceneTextures};
use crate::save_load;
use crate::simulation::{ControlMode, FrameSnapshot, GenerationContext, SimState, TickInput, TickStatus};
use crate::sprites::SpriteSet;
use crate::stats::EvolutionStats;
use crate::trainer;
use crate::ui::{self, HudInfo, Screen, UiAction, UiState};

const GRAPH_HISTORY: usize = 500;

pub fn window_conf() -> Conf {
    Conf {
        window_title: "flapgen".to_string(),
        window_width: config::WINDOW_WIDTH as i32,
        window_height: config::WINDOW_HEIGHT as i32,
        window_resizable: false,
        high_dpi: true,
        ..Default::default()
    }
}

/// One watched training run: the optimizer plus the generation currently on screen.
struct AiRun {
    evo: NeuroEvolution,
    candidates: Vec<Candidate>,
    sim: SimState,
    stop_requested: bool,
}

impl AiRun {
    fn start(config: &SimConfig, evo: NeuroEvolution, sprites: &Arc<SpriteSet>) -> Self {
        let candidates = evo.candidates();
        let sim = SimState::new(
            GenerationContext::new(config, evo.generation),
            ControlMode::Evolution,
            Arc::clone(sprites),
        );
        Self {
            evo,
            candidates,
            sim,
            stop_requested: false,
        }
    }

    fn next_generation(&mut self, config: &SimConfig, sprites: &Arc<SpriteSet>) {
        self.candidates = self.evo.candidates();
        self.sim = SimState::new(
            GenerationContext::new(config, self.evo.generation),
            ControlMode::Evolution,
            Arc::clone(sprites),
        );
    }
}

enum Mode {
    Menu,
    Manual(SimState),
    Ai(AiRun),
}

/// Windowed front end. Runs until the window is closed.
pub async fn run(mut config: SimConfig, checkpoint_path: PathBuf, mut resume: Option<PathBuf>) {
    let sprites = Arc::new(SpriteSet::generate());
    let textures = SceneTextures::new(&sprites);
    let mut render = RenderState::default();
    let mut ui_state = UiState {
        hard_mode: config.oscillation,
        ..Default::default()
    };
    let mut stats = EvolutionStats::new(GRAPH_HISTORY);
    let mut high_score = load_high_score(&config.high_score_path);
    let mut plays: u32 = 0;

    let dt = config.fixed_dt();
    let mut accumulator = 0.0f64;
    let mut jump_latched = false;
    let mut mode = Mode::Menu;

    loop {
        accumulator += (get_frame_time() as f64).min(0.1);

        let mut egui_wants_pointer = false;
        egui_macroquad::cfg(|ctx| {
            egui_wants_pointer = ctx.wants_pointer_input();
        });
        if is_key_pressed(KeyCode::Space)
            || (!egui_wants_pointer && is_mouse_button_pressed(MouseButton::Left))
        {
            jump_latched = true;
        }

        while accumulator >= dt {
            accumulator -= dt;
            render.advance_ground();

            let mut back_to_menu = false;
            match &mut mode {
                Mode::Menu => jump_latched = false,
                Mode::Manual(sim) => {
                    let input = TickInput {
                        jump_pressed: std::mem::take(&mut jump_latched),
                        stop_requested: false,
                    };
                    if let TickStatus::Finished(outcome) = sim.tick(&input, &mut []) {
                        high_score = record_manual_score(
                            &config.high_score_path,
                            high_score,
                            outcome.score,
                            &mut ui_state,
                        );
                        back_to_menu = true;
                    }
                }
                Mode::Ai(run) => {
                    let input = TickInput {
                        jump_pressed: false,
                        stop_requested: run.stop_requested
                            || trainer::tick_budget_spent(&config, run.sim.tick_count),
                    };
                    if let TickStatus::Finished(outcome) = run.sim.tick(&input, &mut run.candidates) {
                        let summary = trainer::conclude_generation(
                            &mut run.evo,
                            &run.candidates,
                            &outcome,
                            &mut stats,
                        );
                        if run.stop_requested {
                            back_to_menu = true;
                        } else if trainer::threshold_reached(&config, summary.best_fitness) {
                            info!(
                                generation = summary.generation,
                                best = summary.best_fitness,
                                "fitness threshold reached"
                            );
                            ui_state.status = Some(format!(
                                "Threshold reached in generation {}",
                                summary.generation
                            ));
                            back_to_menu = true;
                        } else {
                            run.next_generation(&config, &sprites);
                        }
                    }
                }
            }

            if back_to_menu {
                mode = Mode::Menu;
                accumulator = 0.0;
                break;
            }
        }

        let alpha = (accumulator / dt) as f32;
        let (snapshot, screen) = match &mode {
            Mode::Menu => (FrameSnapshot::default(), Screen::Menu { high_score }),
            Mode::Manual(sim) => (
                sim.snapshot(),
                Screen::Run(HudInfo {
                    generation: 0,
                    score: sim.score,
                    alive: sim.alive_count(),
                    evolution: false,
                    hard_mode: sim.context.oscillation,
                }),
            ),
            Mode::Ai(run) => (
                run.sim.snapshot(),
                Screen::Run(HudInfo {
                    generation: run.sim.context.generation,
                    score: run.sim.score,
                    alive: run.sim.alive_count(),
                    evolution: true,
                    hard_mode: run.sim.context.oscillation,
                }),
            ),
        };

        renderer::draw(&snapshot, &textures, &render, alpha);
        let action = ui::draw_ui(&screen, &mut ui_state, &stats);

        match action {
            Some(UiAction::PlayYourself) => {
                config.oscillation = ui_state.hard_mode;
                ui_state.status = None;
                plays += 1;
                mode = Mode::Manual(SimState::new(
                    GenerationContext::new(&config, plays),
                    ControlMode::Manual,
                    Arc::clone(&sprites),
                ));
                jump_latched = false;
                accumulator = 0.0;
            }
            Some(UiAction::WatchAi) => {
                config.oscillation = ui_state.hard_mode;
                ui_state.status = None;
                let evo = match resume.take() {
                    Some(path) => match save_load::load_checkpoint(&path, &config) {
                        Ok(evo) => evo,
                        Err(e) => {
                            warn!(error = %e, "could not resume; starting a fresh population");
                            ui_state.status = Some(e.to_string());
                            NeuroEvolution::new(&config)
                        }
                    },
                    None => NeuroEvolution::new(&config),
                };
                stats = EvolutionStats::new(GRAPH_HISTORY);
                mode = Mode::Ai(AiRun::start(&config, evo, &sprites));
                accumulator = 0.0;
            }
            Some(UiAction::Quit) => match &mut mode {
                Mode::Ai(run) => run.stop_requested = true,
                _ => mode = Mode::Menu,
            },
            Some(UiAction::SaveCheckpoint) => {
                if let Mode::Ai(run) = &mode {
                    ui_state.status = Some(
                        match save_load::save_checkpoint(&run.evo, config.seed, &checkpoint_path) {
                            Ok(()) => format!("Saved generation {}", run.evo.generation),
                            Err(e) => e.to_string(),
                        },
                    );
                }
            }
            Some(UiAction::LoadCheckpoint) => {
                if let Mode::Ai(run) = &mut mode {
                    match save_load::load_checkpoint(&checkpoint_path, &config) {
                        Ok(evo) => {
                            ui_state.status = Some(format!("Loaded generation {}", evo.generation));
                            *run = AiRun::start(&config, evo, &sprites);
                        }
                        Err(e) => ui_state.status = Some(e.to_string()),
                    }
                }
            }
            None => {}
        }

        next_frame().await;
    }
}

fn load_high_score(path: &Path) -> u32 {
    match highscore::load(path) {
        Ok(score) => score,
        Err(e) => {
            warn!(error = %e, "high score unreadable; starting from 0");
            0
        }
    }
}

fn record_manual_score(path: &Path, current: u32, score: u32, ui_state: &mut UiState) -> u32 {
    match highscore::update_if_beaten(path, current, score) {
        Ok(best) => {
            ui_state.status = Some(format!("Score {score}"));
            best
        }
        Err(e) => {
            warn!(error = %e, "could not store high score");
            ui_state.status = Some(e.to_string());
            current.max(score)
        }
    }
}
