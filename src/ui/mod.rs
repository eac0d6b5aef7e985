pub mod graphs;
pub mod menu;
pub mod toolbar;

use crate::stats::EvolutionStats;

/// Panel toggles and front-end preferences.
#[derive(Default)]
pub struct UiState {
    pub show_graphs: bool,
    pub hard_mode: bool,
    /// Last user-facing message, e.g. a failed checkpoint load.
    pub status: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiAction {
    PlayYourself,
    WatchAi,
    Quit,
    SaveCheckpoint,
    LoadCheckpoint,
}

/// Numbers shown in the in-run strip.
#[derive(Clone, Copy, Debug, Default)]
pub struct HudInfo {
    pub generation: u32,
    pub score: u32,
    pub alive: usize,
    pub evolution: bool,
    pub hard_mode: bool,
}

pub enum Screen {
    Menu { high_score: u32 },
    Run(HudInfo),
}

/// Draw all egui panels for the current screen and report what the user clicked.
pub fn draw_ui(screen: &Screen, ui_state: &mut UiState, stats: &EvolutionStats) -> Option<UiAction> {
    let mut action = None;

    egui_macroquad::ui(|ctx| match screen {
        Screen::Menu { high_score } => {
            action = menu::draw_menu(ctx, ui_state, *high_score);
        }
        Screen::Run(hud) => {
            action = toolbar::draw_toolbar(ctx, hud, ui_state);
            if hud.evolution && ui_state.show_graphs {
                graphs::draw_graphs(ctx, stats);
            }
        }
    });

    egui_macroquad::draw();
    action
}
