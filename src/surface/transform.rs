use glam::Vec3;

/// Maps a point from data space into render space.
///
/// Called once per vertex on every update, possibly many times for the same
/// input, so implementations must be pure. Closures qualify only if they are
/// `Fn`, which rules out mutable captures.
pub trait CoordinateTransform {
    fn apply(&self, point: Vec3) -> Vec3;
}

impl<F> CoordinateTransform for F
where
    F: Fn(Vec3) -> Vec3,
{
    #[inline]
    fn apply(&self, point: Vec3) -> Vec3 {
        self(point)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Identity;

impl CoordinateTransform for Identity {
    #[inline]
    fn apply(&self, point: Vec3) -> Vec3 {
        point
    }
}

/// Per-axis scale followed by an offset: `point * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTransform {
    pub scale: Vec3,
    pub offset: Vec3,
}

impl ScaleTransform {
    pub fn new(scale: Vec3, offset: Vec3) -> Self {
        Self { scale, offset }
    }

    /// Fits `x_range` and `z_range` into `[-half_extent, half_extent]` and
    /// scales heights by `height_scale`.
    pub fn fit(x_range: (f32, f32), z_range: (f32, f32), half_extent: f32, height_scale: f32) -> Self {
        let sx = 2.0 * half_extent / (x_range.1 - x_range.0).abs().max(0.001);
        let sz = 2.0 * half_extent / (z_range.1 - z_range.0).abs().max(0.001);
        let cx = (x_range.0 + x_range.1) * 0.5;
        let cz = (z_range.0 + z_range.1) * 0.5;

        Self {
            scale: Vec3::new(sx, height_scale, sz),
            offset: Vec3::new(-cx * sx, 0.0, -cz * sz),
        }
    }
}

impl Default for ScaleTransform {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            offset: Vec3::ZERO,
        }
    }
}

impl CoordinateTransform for ScaleTransform {
    #[inline]
    fn apply(&self, point: Vec3) -> Vec3 {
        point * self.scale + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_transforms() {
        let lift = |p: Vec3| p + Vec3::Y;
        assert_eq!(lift.apply(Vec3::ZERO), Vec3::Y);
    }

    #[test]
    fn fit_maps_range_ends_to_extent() {
        let t = ScaleTransform::fit((-2.0, 6.0), (0.0, 10.0), 100.0, 3.0);
        let lo = t.apply(Vec3::new(-2.0, 1.0, 0.0));
        let hi = t.apply(Vec3::new(6.0, 1.0, 10.0));
        assert!((lo - Vec3::new(-100.0, 3.0, -100.0)).length() < 1e-4);
        assert!((hi - Vec3::new(100.0, 3.0, 100.0)).length() < 1e-4);
    }
}
