use glam::{Mat4, Vec2, Vec3};

/// Orbits a target point. Yaw and pitch are in radians.
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,

    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub rotate_sensitivity: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 14.0,
            yaw: 45.0_f32.to_radians(),
            pitch: 35.0_f32.to_radians(),

            fov: 50.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.05,
            far: 500.0,

            rotate_sensitivity: 0.005,
            zoom_speed: 0.1,
            min_distance: 1.0,
            max_distance: 200.0,
        }
    }
}

impl OrbitCamera {
    pub fn position(&self) -> Vec3 {
        self.target
            + self.distance
                * Vec3::new(
                    self.yaw.cos() * self.pitch.cos(),
                    self.pitch.sin(),
                    self.yaw.sin() * self.pitch.cos(),
                )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn process_drag(&mut self, delta: Vec2) {
        self.yaw += delta.x * self.rotate_sensitivity;
        self.pitch += delta.y * self.rotate_sensitivity;

        let max_pitch = 89.0_f32.to_radians();
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);
    }

    /// Positive `delta` zooms in. Zoom is multiplicative so it feels the
    /// same at every distance.
    pub fn process_scroll(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * self.zoom_speed))
            .clamp(self.min_distance, self.max_distance);
    }

    /// Recenters on a surface of the given footprint and height range.
    pub fn frame(&mut self, half_extent: f32, y_range: (f32, f32)) {
        self.target = Vec3::new(0.0, (y_range.0 + y_range.1) * 0.5, 0.0);
        let radius = half_extent.max((y_range.1 - y_range.0) * 0.5);
        self.distance = (radius * 2.4).clamp(self.min_distance, self.max_distance);
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect = width / height;
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub _padding: f32,
}

impl CameraUniform {
    pub fn from_camera(camera: &OrbitCamera) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_pos: camera.position().to_array(),
            _padding: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_sits_at_distance() {
        let camera = OrbitCamera::default();
        let d = camera.position().distance(camera.target);
        assert!((d - camera.distance).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.process_drag(Vec2::new(0.0, 1e6));
        assert!(camera.pitch < 90.0_f32.to_radians());
        assert!(camera.position().y > camera.target.y);
    }

    #[test]
    fn zoom_stays_in_bounds() {
        let mut camera = OrbitCamera::default();
        for _ in 0..100 {
            camera.process_scroll(5.0);
        }
        assert_eq!(camera.distance, camera.min_distance);
    }

    #[test]
    fn uniform_is_80_bytes() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }
}
