use crate::config::ViewerConfig;
use crate::surface::normals::BoundaryNormals;
use crate::surface::presets::KEYFRAME_PRESETS;

/// Widget-backed state for the side panel. The controller stays the source
/// of truth for progress and keyframes.
pub struct UiState {
    pub selected_preset: usize,
    pub label: String,
    pub expression: String,
    pub x_range: (f32, f32),
    pub z_range: (f32, f32),
    pub samples: u32,

    pub transition_secs: f32,
    pub autoplay: bool,
    pub scrub: f32,

    pub color: [f32; 4],
    pub boundary_normals: BoundaryNormals,

    pub show_grid: bool,
    pub show_stats: bool,
    pub vsync_enabled: bool,
    pub fps_cap_enabled: bool,
    pub fps_cap: u32,
}

impl UiState {
    pub fn from_config(config: &ViewerConfig) -> Self {
        let mut state = Self {
            transition_secs: config.timeline.transition_secs,
            autoplay: config.timeline.autoplay,
            color: config.surface.color,
            boundary_normals: config.surface.boundary_normals,
            vsync_enabled: config.window.vsync,
            fps_cap_enabled: config.window.fps_cap.is_some(),
            fps_cap: config.window.fps_cap.unwrap_or(144),
            ..Self::default()
        };
        state.select_preset(0);
        state
    }

    pub fn select_preset(&mut self, index: usize) {
        let Some(preset) = KEYFRAME_PRESETS.get(index) else {
            return;
        };
        self.selected_preset = index;
        self.label = preset.name.to_string();
        self.expression = preset.expression.to_string();
        self.x_range = preset.x_range;
        self.z_range = preset.z_range;
        self.samples = preset.samples as u32;
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            selected_preset: 0,
            label: String::new(),
            expression: String::new(),
            x_range: (-6.0, 6.0),
            z_range: (-6.0, 6.0),
            samples: 64,

            transition_secs: 1.5,
            autoplay: true,
            scrub: 0.0,

            color: [0.33, 0.4, 0.81, 1.0],
            boundary_normals: BoundaryNormals::Up,

            show_grid: true,
            show_stats: true,
            vsync_enabled: true,
            fps_cap_enabled: false,
            fps_cap: 144,
        }
    }
}
