use std::time::Duration;

use crate::error::SurfaceResult;
use crate::surface::grid::HeightGrid;
use crate::surface::mesh::{MeshBackend, MeshView};
use crate::surface::normals::BoundaryNormals;
use crate::surface::store::{ResolvedState, StateStore};
use crate::surface::topology::TopologyCache;
use crate::surface::transform::CoordinateTransform;
use crate::surface::transition::Transition;
use crate::surface::writer::GeometryWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Empty,
    Sweeping,
    AtKeyframe(usize),
    Blending(usize, usize),
    Saturated,
}

/// What the backend currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Published {
    Nothing,
    Sweep,
    Grid { generation: u64 },
}

/// Drives a [`MeshBackend`] from a single progress value.
///
/// Every mutation republishes synchronously: sweeps replace the backend mesh,
/// blends on an unchanged topology only rewrite vertex attributes.
pub struct SurfaceMeshController<T, B> {
    store: StateStore,
    topology: TopologyCache,
    writer: GeometryWriter,
    transform: T,
    backend: B,
    progress: f32,
    resolved: ResolvedState,
    published: Published,
    color: [f32; 4],
}

impl<T, B> SurfaceMeshController<T, B>
where
    T: CoordinateTransform,
    B: MeshBackend,
{
    pub fn new(transform: T, backend: B) -> Self {
        Self {
            store: StateStore::new(),
            topology: TopologyCache::new(),
            writer: GeometryWriter::default(),
            transform,
            backend,
            progress: 0.0,
            resolved: ResolvedState::Empty,
            published: Published::Nothing,
            color: [1.0; 4],
        }
    }

    pub fn with_boundary_normals(mut self, boundary: BoundaryNormals) -> Self {
        self.writer.boundary = boundary;
        self
    }

    pub fn add_state(&mut self, grid: HeightGrid) -> usize {
        let index = self.store.add_state(grid);
        self.refresh();
        index
    }

    pub fn add_state_from_function<F>(
        &mut self,
        height_fn: F,
        x_range: (f32, f32),
        x_samples: usize,
        z_range: (f32, f32),
        z_samples: usize,
    ) -> SurfaceResult<usize>
    where
        F: Fn(f32, f32) -> f32,
    {
        let index =
            self.store
                .add_state_from_function(height_fn, x_range, x_samples, z_range, z_samples)?;
        self.refresh();
        Ok(index)
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Sets progress and republishes geometry before returning. Negative and
    /// NaN values are stored as 0.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = if progress.is_nan() { 0.0 } else { progress.max(0.0) };
        self.refresh();
    }

    /// Transition from the current progress to the last keyframe.
    pub fn advance_to_next_state(&self, duration: Duration) -> Transition {
        Transition::new(self.progress, self.store.len() as f32, duration)
    }

    /// Transition to keyframe `index`, or `None` if there is no such keyframe.
    pub fn jump_to_state(&self, index: usize, duration: Duration) -> Option<Transition> {
        if index >= self.store.len() {
            log::debug!(
                "jump to keyframe {} ignored, store holds {}",
                index,
                self.store.len()
            );
            return None;
        }
        Some(Transition::new(self.progress, (index + 1) as f32, duration))
    }

    pub fn phase(&self) -> ControllerPhase {
        match self.resolved {
            ResolvedState::Empty => ControllerPhase::Empty,
            ResolvedState::Sweep { .. } => ControllerPhase::Sweeping,
            ResolvedState::Blend { from, to, .. } if from != to => {
                ControllerPhase::Blending(from, to)
            }
            ResolvedState::Blend { from, .. } if Some(from) == self.store.last_index() => {
                ControllerPhase::Saturated
            }
            ResolvedState::Blend { from, .. } => ControllerPhase::AtKeyframe(from),
        }
    }

    pub fn resolved(&self) -> ResolvedState {
        self.resolved
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
        self.backend.set_color(color);
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: T) {
        self.transform = transform;
        self.refresh();
    }

    pub fn boundary_normals(&self) -> BoundaryNormals {
        self.writer.boundary
    }

    pub fn set_boundary_normals(&mut self, boundary: BoundaryNormals) {
        if self.writer.boundary != boundary {
            self.writer.boundary = boundary;
            self.refresh();
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn topology(&self) -> &TopologyCache {
        &self.topology
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn refresh(&mut self) {
        self.resolved = self.store.resolve(self.progress);
        log::trace!("progress {} resolved to {:?}", self.progress, self.resolved);

        match self.resolved {
            ResolvedState::Empty => {
                if self.published != Published::Nothing {
                    self.backend.clear();
                    self.published = Published::Nothing;
                }
            }
            ResolvedState::Sweep { fraction } => {
                let Some(grid) = self.store.first() else {
                    return;
                };
                let mesh = self.writer.build_sweep(grid, fraction, &self.transform);
                self.backend.replace(mesh.view());
                self.published = Published::Sweep;
            }
            ResolvedState::Blend { from, to, t } => {
                let (Some(from), Some(to)) = (self.store.get(from), self.store.get(to)) else {
                    return;
                };
                self.writer
                    .write_blend(&mut self.topology, from, to, t, &self.transform);

                let generation = self.topology.generation();
                if self.published == (Published::Grid { generation }) {
                    self.backend
                        .write_region(self.topology.positions(), self.topology.normals());
                } else {
                    self.backend.replace(MeshView {
                        positions: self.topology.positions(),
                        normals: self.topology.normals(),
                        indices: self.topology.indices(),
                    });
                    self.published = Published::Grid { generation };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::mesh::CpuMesh;
    use crate::surface::transform::Identity;
    use glam::Vec3;

    fn flat(width: usize, depth: usize, height: f32) -> HeightGrid {
        let points = (0..width)
            .flat_map(|x| (0..depth).map(move |z| Vec3::new(x as f32, height, z as f32)))
            .collect();
        HeightGrid::from_points(width, depth, points).unwrap()
    }

    fn controller(keyframes: usize) -> SurfaceMeshController<Identity, CpuMesh> {
        let mut c = SurfaceMeshController::new(Identity, CpuMesh::new());
        for i in 0..keyframes {
            c.add_state(flat(3, 3, i as f32));
        }
        c
    }

    #[test]
    fn phases_follow_progress() {
        let mut c = controller(3);
        let cases = [
            (0.5, ControllerPhase::Sweeping),
            (1.0, ControllerPhase::AtKeyframe(0)),
            (1.5, ControllerPhase::Blending(0, 1)),
            (2.0, ControllerPhase::AtKeyframe(1)),
            (3.0, ControllerPhase::Saturated),
            (8.0, ControllerPhase::Saturated),
        ];
        for (progress, phase) in cases {
            c.set_progress(progress);
            assert_eq!(c.phase(), phase, "progress {progress}");
        }
    }

    #[test]
    fn empty_controller_stays_empty() {
        let mut c = controller(0);
        c.set_progress(2.0);
        assert_eq!(c.phase(), ControllerPhase::Empty);
        assert!(c.backend().mesh.is_empty());
        assert_eq!(c.backend().replacements, 0);
    }

    #[test]
    fn steady_blends_write_regions() {
        let mut c = controller(2);
        c.set_progress(1.25);
        let replacements = c.backend().replacements;

        c.set_progress(1.5);
        c.set_progress(1.75);
        assert_eq!(c.backend().replacements, replacements);
        assert_eq!(c.backend().region_writes, 2);
        assert!(c.backend().mesh.positions.iter().all(|p| (p.y - 0.75).abs() < 1e-6));
    }

    #[test]
    fn leaving_sweep_replaces_topology() {
        let mut c = controller(2);
        c.set_progress(0.5);
        let after_sweep = c.backend().replacements;
        // span 1.5 on a 3-wide grid still shows two columns
        assert_eq!(c.backend().mesh.vertex_count(), 6);

        c.set_progress(1.5);
        assert_eq!(c.backend().replacements, after_sweep + 1);
        assert_eq!(c.backend().mesh.vertex_count(), 9);
        assert_eq!(c.backend().mesh.triangle_count(), 8);
    }

    #[test]
    fn sweep_updates_always_replace() {
        let mut c = controller(1);
        c.set_progress(0.2);
        let before = c.backend().replacements;
        c.set_progress(0.4);
        c.set_progress(0.8);
        assert_eq!(c.backend().replacements, before + 2);
        assert_eq!(c.backend().region_writes, 0);
    }

    #[test]
    fn adding_a_keyframe_unsaturates() {
        let mut c = controller(1);
        c.set_progress(1.5);
        assert_eq!(c.phase(), ControllerPhase::Saturated);

        c.add_state(flat(3, 3, 4.0));
        assert_eq!(c.phase(), ControllerPhase::Blending(0, 1));
        assert!(c.backend().mesh.positions.iter().all(|p| (p.y - 2.0).abs() < 1e-6));
    }

    #[test]
    fn transitions_target_keyframes() {
        let mut c = controller(3);
        c.set_progress(1.25);

        let next = c.advance_to_next_state(Duration::from_secs(2));
        assert_eq!((next.from, next.to), (1.25, 3.0));

        let jump = c.jump_to_state(1, Duration::from_millis(500)).unwrap();
        assert_eq!(jump.to, 2.0);
        assert!(c.jump_to_state(3, Duration::from_secs(1)).is_none());
    }

    #[test]
    fn negative_progress_is_clamped() {
        let mut c = controller(1);
        c.set_progress(-3.0);
        assert_eq!(c.progress(), 0.0);
        assert!(c.backend().mesh.is_empty());
    }

    #[test]
    fn color_is_forwarded() {
        let mut c = controller(1);
        c.set_color([0.1, 0.2, 0.3, 1.0]);
        assert_eq!(c.backend().color, [0.1, 0.2, 0.3, 1.0]);
    }
}
