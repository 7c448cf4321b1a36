pub struct KeyframePreset {
    pub name: &'static str,
    pub description: &'static str,
    pub expression: &'static str,
    pub x_range: (f32, f32),
    pub z_range: (f32, f32),
    pub samples: usize,
}

/// Expressions are in `x` and `z` and evaluate to a height.
pub const KEYFRAME_PRESETS: &[KeyframePreset] = &[
    KeyframePreset {
        name: "Flat",
        description: "Zero plane",
        expression: "0",
        x_range: (-6.0, 6.0),
        z_range: (-6.0, 6.0),
        samples: 64,
    },
    KeyframePreset {
        name: "Sine Wave",
        description: "sin(x) + sin(z)",
        expression: "sin(x) + sin(z)",
        x_range: (-6.0, 6.0),
        z_range: (-6.0, 6.0),
        samples: 64,
    },
    KeyframePreset {
        name: "Ripple",
        description: "Radial wave decaying outwards",
        expression: "3 * sin(2 * sqrt(x^2 + z^2)) / (sqrt(x^2 + z^2) + 1)",
        x_range: (-6.0, 6.0),
        z_range: (-6.0, 6.0),
        samples: 64,
    },
    KeyframePreset {
        name: "Saddle",
        description: "x² - z², scaled down",
        expression: "(x^2 - z^2) / 12",
        x_range: (-6.0, 6.0),
        z_range: (-6.0, 6.0),
        samples: 64,
    },
    KeyframePreset {
        name: "Peaks",
        description: "Gaussian bumps, stretched over the domain",
        expression: "3*(1-x/2)^2*exp(-(x/2)^2-(z/2+1)^2) - 10*(x/10-(x/2)^3-(z/2)^5)*exp(-(x/2)^2-(z/2)^2) - exp(-(x/2+1)^2-(z/2)^2)/3",
        x_range: (-6.0, 6.0),
        z_range: (-6.0, 6.0),
        samples: 64,
    },
    KeyframePreset {
        name: "Egg Crate",
        description: "sin(x) * cos(z)",
        expression: "2 * sin(x) * cos(z)",
        x_range: (-6.0, 6.0),
        z_range: (-6.0, 6.0),
        samples: 64,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::sampler::compile_height_fn;

    #[test]
    fn every_preset_compiles_and_samples() {
        for preset in KEYFRAME_PRESETS {
            let f = compile_height_fn(preset.expression)
                .unwrap_or_else(|e| panic!("{}: {e}", preset.name));
            let y = f(preset.x_range.0, preset.z_range.1);
            assert!(y.is_finite(), "{} produced {y}", preset.name);
        }
    }
}
