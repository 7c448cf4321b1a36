use glam::Vec3;

use crate::error::{SurfaceError, SurfaceResult};

/// One recorded keyframe: `width * depth` points stored row-major, so the
/// point at column `x`, row `z` lives at `x * depth + z`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    width: usize,
    depth: usize,
    points: Vec<Vec3>,
}

impl HeightGrid {
    pub fn from_points(width: usize, depth: usize, points: Vec<Vec3>) -> SurfaceResult<Self> {
        if width == 0 || depth == 0 {
            return Err(SurfaceError::EmptyGrid { width, depth });
        }

        let expected = width * depth;
        if points.len() != expected {
            return Err(SurfaceError::PointCountMismatch {
                width,
                depth,
                expected,
                actual: points.len(),
            });
        }

        Ok(Self {
            width,
            depth,
            points,
        })
    }

    /// Samples `height_fn(x, z)` on a uniform grid that includes both ends of
    /// each range. Non-finite heights are stored as zero.
    pub fn sample<F>(
        height_fn: F,
        x_range: (f32, f32),
        x_samples: usize,
        z_range: (f32, f32),
        z_samples: usize,
    ) -> SurfaceResult<Self>
    where
        F: Fn(f32, f32) -> f32,
    {
        if x_samples < 2 || z_samples < 2 {
            return Err(SurfaceError::TooFewSamples {
                x_samples,
                z_samples,
            });
        }
        check_range(x_range)?;
        check_range(z_range)?;

        let dx = (x_range.1 - x_range.0) / (x_samples - 1) as f32;
        let dz = (z_range.1 - z_range.0) / (z_samples - 1) as f32;

        let mut points = Vec::with_capacity(x_samples * z_samples);
        for i in 0..x_samples {
            for j in 0..z_samples {
                let x = x_range.0 + i as f32 * dx;
                let z = z_range.0 + j as f32 * dz;
                let y = height_fn(x, z);
                let y = if y.is_finite() { y } else { 0.0 };
                points.push(Vec3::new(x, y, z));
            }
        }

        Ok(Self {
            width: x_samples,
            depth: z_samples,
            points,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.depth)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> Vec3 {
        self.points[x * self.depth + z]
    }

    pub fn column(&self, x: usize) -> &[Vec3] {
        let start = x * self.depth;
        &self.points[start..start + self.depth]
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn y_range(&self) -> (f32, f32) {
        self.points
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)))
    }
}

fn check_range(range: (f32, f32)) -> SurfaceResult<()> {
    if range.0.is_finite() && range.1.is_finite() {
        Ok(())
    } else {
        Err(SurfaceError::InvalidRange {
            start: range.0,
            end: range.1,
        })
    }
}
