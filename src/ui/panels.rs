use egui::{Color32, Context, RichText, ScrollArea, TextEdit, Ui};

use crate::surface::controller::ControllerPhase;
use crate::surface::normals::BoundaryNormals;
use crate::surface::presets::KEYFRAME_PRESETS;
use crate::surface::sampler::SampleRequest;
use crate::ui::state::UiState;
use crate::ui::theme::*;

#[derive(Default)]
pub struct UiActions {
    pub add_keyframe: Option<SampleRequest>,
    pub jump_to: Option<usize>,
    pub next_state: bool,
    pub replay: bool,
    pub scrub_to: Option<f32>,
    pub stop_playback: bool,
    pub color_changed: bool,
    pub boundary_changed: bool,
    pub frame_camera: bool,
}

/// Read-only numbers the panel displays.
pub struct PanelStats<'a> {
    pub fps: f32,
    pub progress: f32,
    pub phase: ControllerPhase,
    pub keyframes: &'a [String],
    pub pending: usize,
    pub vertex_count: u32,
    pub triangle_count: u32,
    pub topology_generation: u64,
    pub playing: bool,
}

pub fn draw_side_panel(
    ctx: &Context,
    state: &mut UiState,
    stats: &PanelStats<'_>,
    last_error: &Option<String>,
) -> UiActions {
    let mut actions = UiActions::default();

    egui::SidePanel::right("control_panel")
        .min_width(320.0)
        .max_width(420.0)
        .default_width(350.0)
        .frame(egui::Frame::default().fill(BG_PANEL).inner_margin(16.0))
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading(RichText::new("Surface Morph 3D").strong());
                ui.add_space(4.0);
                ui.label(RichText::new("Keyframed height-field morphing").color(TEXT_MUTED).size(11.0));
                ui.add_space(16.0);

                timeline_controls(ui, state, stats, &mut actions);
                ui.add_space(16.0);
                ui.separator();
                ui.add_space(12.0);

                keyframe_list(ui, stats, &mut actions);
                ui.add_space(16.0);

                add_keyframe(ui, state, last_error, &mut actions);
                ui.add_space(16.0);
                ui.separator();
                ui.add_space(12.0);

                appearance_controls(ui, state, &mut actions);
                ui.add_space(16.0);

                perf_controls(ui, state);
                ui.add_space(16.0);

                if state.show_stats {
                    stats_panel(ui, stats);
                }
            });
        });

    actions
}

fn section_header(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(TEXT_MUTED).size(11.0).strong());
    ui.add_space(4.0);
}

fn timeline_controls(ui: &mut Ui, state: &mut UiState, stats: &PanelStats<'_>, actions: &mut UiActions) {
    section_header(ui, "TIMELINE");

    ui.horizontal(|ui| {
        let next = egui::Button::new(RichText::new("Next State").color(BG_BLACK))
            .fill(ACCENT_GREEN)
            .min_size(egui::vec2(100.0, 30.0));
        if ui.add_enabled(!stats.keyframes.is_empty(), next).clicked() {
            actions.next_state = true;
        }
        if ui.button("Replay").clicked() {
            actions.replay = true;
        }
        if ui.add_enabled(stats.playing, egui::Button::new("Stop")).clicked() {
            actions.stop_playback = true;
        }
    });
    ui.add_space(6.0);

    if !stats.playing {
        state.scrub = stats.progress;
    }
    let max = (stats.keyframes.len() as f32).max(1.0) + 0.5;
    ui.horizontal(|ui| {
        ui.label("Progress:");
        let slider = egui::Slider::new(&mut state.scrub, 0.0..=max).max_decimals(3);
        if ui.add(slider).changed() {
            actions.scrub_to = Some(state.scrub);
        }
    });
    ui.horizontal(|ui| {
        ui.label("Seconds per state:");
        ui.add(egui::DragValue::new(&mut state.transition_secs).range(0.0..=30.0).speed(0.05));
    });
    ui.checkbox(&mut state.autoplay, "Play new keyframes on arrival");
}

fn keyframe_list(ui: &mut Ui, stats: &PanelStats<'_>, actions: &mut UiActions) {
    section_header(ui, "KEYFRAMES");

    if stats.keyframes.is_empty() {
        ui.label(RichText::new("No keyframes yet").color(TEXT_MUTED).italics());
    }
    let current = match stats.phase {
        ControllerPhase::AtKeyframe(i) | ControllerPhase::Blending(i, _) => Some(i),
        ControllerPhase::Saturated => stats.keyframes.len().checked_sub(1),
        ControllerPhase::Empty | ControllerPhase::Sweeping => None,
    };

    egui::Grid::new("keyframes").num_columns(2).spacing([12.0, 4.0]).show(ui, |ui| {
        for (i, label) in stats.keyframes.iter().enumerate() {
            let text = RichText::new(format!("{}. {}", i + 1, label));
            let text = if current == Some(i) { text.color(ACCENT_TEAL) } else { text };
            ui.label(text);
            if ui.small_button("Go").clicked() {
                actions.jump_to = Some(i);
            }
            ui.end_row();
        }
    });

    if stats.pending > 0 {
        ui.add_space(4.0);
        ui.label(RichText::new(format!("Sampling {} more...", stats.pending)).color(ACCENT_ORANGE).size(11.0));
    }
}

fn add_keyframe(ui: &mut Ui, state: &mut UiState, error: &Option<String>, actions: &mut UiActions) {
    section_header(ui, "ADD KEYFRAME");

    egui::ComboBox::from_id_salt("keyframe_presets")
        .selected_text(KEYFRAME_PRESETS.get(state.selected_preset).map_or("Custom", |p| p.name))
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for (i, preset) in KEYFRAME_PRESETS.iter().enumerate() {
                if ui.selectable_label(state.selected_preset == i, preset.name).clicked() {
                    state.select_preset(i);
                }
            }
        });
    if let Some(preset) = KEYFRAME_PRESETS.get(state.selected_preset) {
        ui.add_space(4.0);
        ui.label(RichText::new(preset.description).color(TEXT_MUTED).size(11.0).italics());
    }
    ui.add_space(6.0);

    ui.horizontal(|ui| {
        ui.label("Label:");
        ui.text_edit_singleline(&mut state.label);
    });
    ui.label(RichText::new("y = f(x, z)").color(TEXT_MUTED).size(11.0));
    egui::Frame::default()
        .fill(BG_BLACK)
        .stroke(egui::Stroke::new(1.0, BORDER_SUBTLE))
        .rounding(6.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.add(
                TextEdit::multiline(&mut state.expression)
                    .font(egui::FontId::new(12.0, egui::FontFamily::Monospace))
                    .code_editor()
                    .desired_width(f32::INFINITY)
                    .desired_rows(3)
                    .text_color(TEXT_PRIMARY),
            );
        });

    range_controls(ui, "X", &mut state.x_range);
    range_controls(ui, "Z", &mut state.z_range);
    ui.horizontal(|ui| {
        ui.label("Samples:");
        ui.add(egui::Slider::new(&mut state.samples, 2..=256));
    });

    if let Some(err) = error {
        ui.add_space(6.0);
        egui::Frame::default()
            .fill(Color32::from_rgb(40, 15, 15))
            .stroke(egui::Stroke::new(1.0, ACCENT_RED))
            .rounding(4.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(err).color(ACCENT_RED).size(11.0));
            });
    }

    ui.add_space(8.0);
    let add = egui::Button::new(RichText::new("Sample & Append").color(BG_BLACK))
        .fill(ACCENT_BLUE)
        .min_size(egui::vec2(ui.available_width(), 30.0));
    if ui.add(add).clicked() {
        let label = if state.label.trim().is_empty() {
            state.expression.clone()
        } else {
            state.label.clone()
        };
        actions.add_keyframe = Some(SampleRequest {
            label,
            expression: state.expression.clone(),
            x_range: state.x_range,
            x_samples: state.samples as usize,
            z_range: state.z_range,
            z_samples: state.samples as usize,
        });
    }
}

fn range_controls(ui: &mut Ui, label: &str, range: &mut (f32, f32)) {
    ui.horizontal(|ui| {
        ui.label(format!("{}:", label));
        ui.add(egui::DragValue::new(&mut range.0).speed(0.1));
        ui.label("to");
        ui.add(egui::DragValue::new(&mut range.1).speed(0.1));
    });
}

fn appearance_controls(ui: &mut Ui, state: &mut UiState, actions: &mut UiActions) {
    section_header(ui, "APPEARANCE");

    ui.horizontal(|ui| {
        ui.label("Colour:");
        if ui.color_edit_button_rgba_unmultiplied(&mut state.color).changed() {
            actions.color_changed = true;
        }
        ui.checkbox(&mut state.show_grid, "Floor grid");
    });

    ui.horizontal(|ui| {
        ui.label("Edge normals:");
        let before = state.boundary_normals;
        ui.selectable_value(&mut state.boundary_normals, BoundaryNormals::Up, "Up");
        ui.selectable_value(&mut state.boundary_normals, BoundaryNormals::OneSided, "One-sided");
        if state.boundary_normals != before {
            actions.boundary_changed = true;
        }
    });

    if ui.button("Frame surface").clicked() {
        actions.frame_camera = true;
    }
}

fn perf_controls(ui: &mut Ui, state: &mut UiState) {
    section_header(ui, "PERFORMANCE");
    ui.horizontal(|ui| {
        ui.checkbox(&mut state.vsync_enabled, "VSync");
        ui.checkbox(&mut state.show_stats, "Stats");
    });
    ui.horizontal(|ui| {
        ui.checkbox(&mut state.fps_cap_enabled, "FPS Cap:");
        ui.add_enabled(
            state.fps_cap_enabled,
            egui::DragValue::new(&mut state.fps_cap).range(30..=500).suffix(" fps"),
        );
    });
}

fn stats_panel(ui: &mut Ui, stats: &PanelStats<'_>) {
    section_header(ui, "STATISTICS");
    egui::Frame::default()
        .fill(BG_WIDGET)
        .stroke(egui::Stroke::new(1.0, BORDER_SUBTLE))
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));

            let fps_color = if stats.fps >= 60.0 {
                ACCENT_GREEN
            } else if stats.fps >= 30.0 {
                ACCENT_ORANGE
            } else {
                ACCENT_RED
            };

            egui::Grid::new("stats").num_columns(2).spacing([20.0, 4.0]).show(ui, |ui| {
                ui.label(RichText::new("FPS").color(TEXT_MUTED));
                ui.label(RichText::new(format!("{:.0}", stats.fps)).color(fps_color));
                ui.end_row();

                ui.label(RichText::new("Progress").color(TEXT_MUTED));
                ui.label(RichText::new(format!("{:.3}", stats.progress)).color(ACCENT_BLUE));
                ui.end_row();

                ui.label(RichText::new("Vertices").color(TEXT_MUTED));
                ui.label(RichText::new(fmt_num(stats.vertex_count as usize)).color(TEXT_PRIMARY));
                ui.end_row();

                ui.label(RichText::new("Triangles").color(TEXT_MUTED));
                ui.label(RichText::new(fmt_num(stats.triangle_count as usize)).color(TEXT_PRIMARY));
                ui.end_row();

                ui.label(RichText::new("Topology gen").color(TEXT_MUTED));
                ui.label(RichText::new(stats.topology_generation.to_string()).color(TEXT_PRIMARY));
                ui.end_row();
            });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Phase:").color(TEXT_MUTED));
                ui.label(phase_text(stats.phase));
            });
        });
}

fn phase_text(phase: ControllerPhase) -> RichText {
    match phase {
        ControllerPhase::Empty => RichText::new("Empty").color(TEXT_MUTED),
        ControllerPhase::Sweeping => RichText::new("Sweeping").color(ACCENT_ORANGE),
        ControllerPhase::AtKeyframe(i) => RichText::new(format!("Keyframe {}", i + 1)).color(ACCENT_GREEN),
        ControllerPhase::Blending(a, b) => {
            RichText::new(format!("Blending {} -> {}", a + 1, b + 1)).color(ACCENT_TEAL)
        }
        ControllerPhase::Saturated => RichText::new("Saturated").color(ACCENT_BLUE),
    }
}

pub fn draw_help_overlay(ctx: &Context, distance: f32) {
    egui::Area::new(egui::Id::new("help_overlay"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(Color32::from_black_alpha(180))
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));
                    ui.label(RichText::new("LMB+Drag - Orbit | Scroll - Zoom | F - Frame").color(TEXT_MUTED));
                    ui.label(RichText::new("N - Next state | R - Replay | 1-9 - Jump").color(TEXT_MUTED));
                    ui.label(RichText::new(format!("Distance: {:.1}", distance)).color(TEXT_MUTED));
                });
        });
}

fn fmt_num(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_counts() {
        assert_eq!(fmt_num(12), "12");
        assert_eq!(fmt_num(8_400), "8.4K");
        assert_eq!(fmt_num(2_500_000), "2.50M");
    }
}
