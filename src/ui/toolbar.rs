use egui;

use super::{HudInfo, UiAction, UiState};

/// In-run status strip: generation, score, alive count and run controls.
pub fn draw_toolbar(ctx: &egui::Context, hud: &HudInfo, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.add_space(3.0);
        ui.horizontal_wrapped(|ui| {
            if ui.button("Quit").clicked() {
                action = Some(UiAction::Quit);
            }
            ui.separator();

            if hud.evolution {
                metric_chip(ui, "Gen", format!("{}", hud.generation));
            }
            metric_chip(ui, "Score", format!("{}", hud.score));
            if hud.evolution {
                metric_chip(ui, "Alive", format!("{}", hud.alive));
            }
            if hud.hard_mode {
                status_chip(ui, "HARD", egui::Color32::from_rgb(230, 120, 90));
            }

            if hud.evolution {
                ui.separator();
                ui.toggle_value(&mut ui_state.show_graphs, "Graphs");
                if ui.button("Save").clicked() {
                    action = Some(UiAction::SaveCheckpoint);
                }
                if ui.button("Load").clicked() {
                    action = Some(UiAction::LoadCheckpoint);
                }
            }
        });

        if let Some(status) = &ui_state.status {
            ui.label(
                egui::RichText::new(status)
                    .small()
                    .color(egui::Color32::from_rgb(150, 170, 185)),
            );
        }
        ui.add_space(3.0);
    });

    action
}

fn metric_chip(ui: &mut egui::Ui, key: &str, value: String) {
    let text = egui::RichText::new(format!("{key}: {value}"))
        .small()
        .color(egui::Color32::from_rgb(205, 215, 225));
    ui.group(|ui| {
        ui.label(text);
    });
}

fn status_chip(ui: &mut egui::Ui, label: &str, color: egui::Color32) {
    ui.group(|ui| {
        ui.label(egui::RichText::new(label).small().strong().color(color));
    });
}
