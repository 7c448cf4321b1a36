use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

pub const BG_BLACK: Color32 = Color32::from_rgb(2, 2, 4);
pub const BG_PANEL: Color32 = Color32::from_rgb(8, 8, 12);
pub const BG_WIDGET: Color32 = Color32::from_rgb(18, 18, 26);
pub const BG_WIDGET_HOVER: Color32 = Color32::from_rgb(28, 28, 40);
pub const BG_WIDGET_ACTIVE: Color32 = Color32::from_rgb(38, 38, 54);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(170, 170, 176);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(105, 105, 114);
pub const TEXT_BRIGHT: Color32 = Color32::from_rgb(222, 222, 228);

pub const ACCENT_GREEN: Color32 = Color32::from_rgb(52, 168, 83);
pub const ACCENT_RED: Color32 = Color32::from_rgb(190, 48, 48);
pub const ACCENT_BLUE: Color32 = Color32::from_rgb(84, 102, 206);
pub const ACCENT_TEAL: Color32 = Color32::from_rgb(32, 160, 170);
pub const ACCENT_ORANGE: Color32 = Color32::from_rgb(196, 128, 40);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgba_premultiplied(48, 52, 104, 77);

fn widget(bg: Color32, border: Stroke, fg: Color32, expansion: f32) -> egui::style::WidgetVisuals {
    egui::style::WidgetVisuals {
        bg_fill: bg,
        weak_bg_fill: bg,
        bg_stroke: border,
        rounding: Rounding::same(4.0),
        fg_stroke: Stroke::new(1.0, fg),
        expansion,
    }
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut style = Style::default();

    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.widgets.noninteractive = egui::style::WidgetVisuals {
        weak_bg_fill: BG_PANEL,
        ..widget(BG_WIDGET, Stroke::new(1.0, BORDER_SUBTLE), TEXT_MUTED, 0.0)
    };
    visuals.widgets.inactive = widget(BG_WIDGET, Stroke::new(1.0, BORDER_SUBTLE), TEXT_PRIMARY, 0.0);
    visuals.widgets.hovered = widget(BG_WIDGET_HOVER, Stroke::new(1.0, ACCENT_BLUE), TEXT_BRIGHT, 1.0);
    visuals.widgets.active = widget(BG_WIDGET_ACTIVE, Stroke::new(2.0, ACCENT_TEAL), TEXT_BRIGHT, 1.0);
    visuals.widgets.open = widget(BG_WIDGET_ACTIVE, Stroke::new(1.0, ACCENT_BLUE), TEXT_BRIGHT, 0.0);
    visuals.selection = egui::style::Selection {
        bg_fill: ACCENT_TEAL.gamma_multiply(0.4),
        stroke: Stroke::new(1.0, ACCENT_TEAL),
    };
    visuals.hyperlink_color = ACCENT_BLUE;
    visuals.faint_bg_color = BG_PANEL;
    visuals.extreme_bg_color = BG_BLACK;
    visuals.code_bg_color = BG_BLACK;
    visuals.warn_fg_color = ACCENT_ORANGE;
    visuals.error_fg_color = ACCENT_RED;
    visuals.window_rounding = Rounding::same(6.0);
    visuals.window_fill = BG_PANEL;
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.panel_fill = BG_PANEL;
    visuals.slider_trailing_fill = true;
    visuals.handle_shape = egui::style::HandleShape::Circle;
    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(12.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.slider_width = 190.0;

    style.text_styles = [
        (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
    ]
    .into();

    ctx.set_style(style);
}
