use egui;

use crate::stats::{EvolutionStats, RingBuffer};

const BEST_COLOR: egui::Color32 = egui::Color32::from_rgb(120, 210, 120);
const MEAN_COLOR: egui::Color32 = egui::Color32::from_rgb(210, 200, 110);
const SCORE_COLOR: egui::Color32 = egui::Color32::from_rgb(120, 180, 255);

/// Per-generation fitness and score history.
pub fn draw_graphs(ctx: &egui::Context, stats: &EvolutionStats) {
    egui::Window::new("Fitness")
        .default_pos(egui::pos2(20.0, 420.0))
        .default_size(egui::vec2(300.0, 260.0))
        .resizable(true)
        .show(ctx, |ui| {
            ui.label(format!(
                "All-time best fitness {:.1}, best score {}",
                stats.all_time_best, stats.all_time_score
            ));

            ui.collapsing("Fitness (best / mean)", |ui| {
                let size = egui::vec2(ui.available_width(), 90.0);
                let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
                let rect = response.rect;
                painter.rect_filled(rect, 2.0, egui::Color32::from_gray(20));

                let (lo, hi) = shared_range(&[&stats.best_fitness, &stats.mean_fitness]);
                draw_line_in_rect(&painter, &stats.best_fitness, rect, lo, hi, BEST_COLOR);
                draw_line_in_rect(&painter, &stats.mean_fitness, rect, lo, hi, MEAN_COLOR);

                ui.horizontal(|ui| {
                    ui.colored_label(BEST_COLOR, "Best");
                    ui.colored_label(MEAN_COLOR, "Mean");
                });
            });

            ui.collapsing("Score", |ui| {
                draw_line_graph(ui, &stats.score, SCORE_COLOR);
            });
        });
}

fn draw_line_graph(ui: &mut egui::Ui, buffer: &RingBuffer, color: egui::Color32) {
    let size = egui::vec2(ui.available_width(), 70.0);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let rect = response.rect;

    painter.rect_filled(rect, 2.0, egui::Color32::from_gray(20));

    let (lo, hi) = shared_range(&[buffer]);
    draw_line_in_rect(&painter, buffer, rect, lo, hi, color);

    if let Some(val) = buffer.last() {
        painter.text(
            egui::pos2(rect.right() - 4.0, rect.top() + 2.0),
            egui::Align2::RIGHT_TOP,
            format!("{val:.0}"),
            egui::FontId::proportional(10.0),
            egui::Color32::from_gray(200),
        );
    }
}

/// Min and max across several series; fitness may be negative.
fn shared_range(buffers: &[&RingBuffer]) -> (f32, f32) {
    let (lo, hi) = buffers
        .iter()
        .filter_map(|b| b.range())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), (l, h)| {
            (lo.min(l), hi.max(h))
        });
    if lo > hi {
        return (0.0, 1.0);
    }
    (lo, hi.max(lo + 1.0))
}

fn draw_line_in_rect(
    painter: &egui::Painter,
    buffer: &RingBuffer,
    rect: egui::Rect,
    lo: f32,
    hi: f32,
    color: egui::Color32,
) {
    let len = buffer.len();
    if len < 2 {
        return;
    }
    let range = hi - lo;

    let points: Vec<egui::Pos2> = buffer
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = rect.left() + (i as f32 / (len - 1) as f32) * rect.width();
            let y = rect.bottom() - ((v - lo) / range) * rect.height();
            egui::pos2(x, y)
        })
        .collect();

    for pair in points.windows(2) {
        painter.line_segment([pair[0], pair[1]], egui::Stroke::new(1.5, color));
    }
}
