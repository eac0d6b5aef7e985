use egui;

use super::{UiAction, UiState};

/// Main menu: pick a mode, toggle oscillating gaps.
pub fn draw_menu(ctx: &egui::Context, ui_state: &mut UiState, high_score: u32) -> Option<UiAction> {
    let mut action = None;

    egui::Window::new("flapgen")
        .title_bar(false)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, -40.0))
        .fixed_size(egui::vec2(240.0, 220.0))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new("FLAPGEN")
                        .heading()
                        .strong()
                        .color(egui::Color32::from_rgb(250, 220, 90)),
                );
                ui.add_space(10.0);

                let wide = egui::vec2(180.0, 32.0);
                if ui.add_sized(wide, egui::Button::new("Play Yourself")).clicked() {
                    action = Some(UiAction::PlayYourself);
                }
                if ui.add_sized(wide, egui::Button::new("Watch AI Play")).clicked() {
                    action = Some(UiAction::WatchAi);
                }

                ui.add_space(6.0);
                ui.checkbox(&mut ui_state.hard_mode, "Hard Mode (moving gaps)");

                ui.add_space(6.0);
                ui.label(format!("High Score: {high_score}"));

                if let Some(status) = &ui_state.status {
                    ui.add_space(4.0);
                    ui.label(
                        egui::RichText::new(status)
                            .small()
                            .color(egui::Color32::from_rgb(200, 200, 200)),
                    );
                }
            });
        });

    action
}
