use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::SurfaceResult;
use crate::surface::normals::BoundaryNormals;
use crate::surface::presets::KEYFRAME_PRESETS;
use crate::surface::sampler::SampleRequest;

pub const CONFIG_ENV: &str = "SURFMORPH_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub surface: SurfaceConfig,
    pub timeline: TimelineConfig,
    pub keyframes: Vec<KeyframeConfig>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            surface: SurfaceConfig::default(),
            timeline: TimelineConfig::default(),
            keyframes: default_keyframes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub fps_cap: Option<u32>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Surface Morph 3D".into(),
            width: 1600,
            height: 900,
            vsync: true,
            fps_cap: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Half the side length of the rendered footprint.
    pub half_extent: f32,
    pub height_scale: f32,
    pub color: [f32; 4],
    pub boundary_normals: BoundaryNormals,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            half_extent: 5.0,
            height_scale: 0.6,
            color: [0.33, 0.4, 0.81, 1.0],
            boundary_normals: BoundaryNormals::Up,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub transition_secs: f32,
    /// Play the reveal sweep and all keyframes once at startup.
    pub autoplay: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            transition_secs: 1.5,
            autoplay: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeConfig {
    pub label: String,
    pub expression: String,
    #[serde(default = "default_range")]
    pub x_range: (f32, f32),
    #[serde(default = "default_range")]
    pub z_range: (f32, f32),
    #[serde(default = "default_samples")]
    pub samples: usize,
}

impl KeyframeConfig {
    pub fn to_request(&self) -> SampleRequest {
        SampleRequest {
            label: self.label.clone(),
            expression: self.expression.clone(),
            x_range: self.x_range,
            x_samples: self.samples,
            z_range: self.z_range,
            z_samples: self.samples,
        }
    }
}

fn default_range() -> (f32, f32) {
    (-6.0, 6.0)
}

fn default_samples() -> usize {
    64
}

fn default_keyframes() -> Vec<KeyframeConfig> {
    ["Flat", "Ripple", "Saddle", "Peaks"]
        .iter()
        .filter_map(|name| KEYFRAME_PRESETS.iter().find(|p| p.name == *name))
        .map(|preset| KeyframeConfig {
            label: preset.name.into(),
            expression: preset.expression.into(),
            x_range: preset.x_range,
            z_range: preset.z_range,
            samples: preset.samples,
        })
        .collect()
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> SurfaceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> SurfaceResult<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn to_json(&self) -> SurfaceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Path from the first CLI argument, else from `SURFMORPH_CONFIG`.
    pub fn source_path() -> Option<PathBuf> {
        std::env::args_os()
            .nth(1)
            .or_else(|| std::env::var_os(CONFIG_ENV))
            .map(PathBuf::from)
    }

    /// Loads from [`ViewerConfig::source_path`], falling back to defaults
    /// with a warning when the file is missing or malformed.
    pub fn from_env_or_args() -> Self {
        let Some(path) = Self::source_path() else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(config.surface.boundary_normals, BoundaryNormals::Up);
        assert_eq!(config.keyframes.len(), 4);
        assert_eq!(config.keyframes[0].label, "Flat");
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let json = r#"{
            "surface": { "boundary_normals": "one_sided" },
            "timeline": { "autoplay": false },
            "keyframes": [{ "label": "bowl", "expression": "x^2 + z^2", "samples": 16 }]
        }"#;
        let config = ViewerConfig::from_json(json).unwrap();
        assert_eq!(config.surface.boundary_normals, BoundaryNormals::OneSided);
        assert_eq!(config.surface.half_extent, 5.0);
        assert!(!config.timeline.autoplay);

        let request = config.keyframes[0].to_request();
        assert_eq!(request.x_range, (-6.0, 6.0));
        assert_eq!((request.x_samples, request.z_samples), (16, 16));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            ViewerConfig::from_json("{ \"window\": 3 }"),
            Err(crate::error::SurfaceError::Config(_))
        ));
    }

    #[test]
    fn json_roundtrip() {
        let config = ViewerConfig::default();
        let back = ViewerConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }
}
