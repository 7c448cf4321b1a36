use glam::Vec3;

/// Transient geometry produced by the sweep path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn view(&self) -> MeshView<'_> {
        MeshView {
            positions: &self.positions,
            normals: &self.normals,
            indices: &self.indices,
        }
    }
}

/// Read-only geometry handed to a [`MeshBackend`].
#[derive(Debug, Clone, Copy)]
pub struct MeshView<'a> {
    pub positions: &'a [Vec3],
    pub normals: &'a [Vec3],
    pub indices: &'a [u32],
}

impl MeshView<'_> {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// The rendering side of the engine.
///
/// `replace` swaps topology and all buffers. `write_region` overwrites
/// vertex attributes in place and is only called with the same vertex count
/// as the last `replace`.
pub trait MeshBackend {
    fn replace(&mut self, mesh: MeshView<'_>);

    fn write_region(&mut self, positions: &[Vec3], normals: &[Vec3]);

    fn clear(&mut self);

    fn set_color(&mut self, _color: [f32; 4]) {}
}

/// In-memory backend. Keeps the last published geometry and counts how it
/// arrived.
#[derive(Debug, Default)]
pub struct CpuMesh {
    pub mesh: TriangleMesh,
    pub color: [f32; 4],
    pub replacements: u64,
    pub region_writes: u64,
}

impl CpuMesh {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MeshBackend for CpuMesh {
    fn replace(&mut self, mesh: MeshView<'_>) {
        self.mesh.positions.clear();
        self.mesh.positions.extend_from_slice(mesh.positions);
        self.mesh.normals.clear();
        self.mesh.normals.extend_from_slice(mesh.normals);
        self.mesh.indices.clear();
        self.mesh.indices.extend_from_slice(mesh.indices);
        self.replacements += 1;
    }

    fn write_region(&mut self, positions: &[Vec3], normals: &[Vec3]) {
        if positions.len() != self.mesh.positions.len() || normals.len() != self.mesh.normals.len() {
            log::warn!(
                "region write of {} vertices into a {} vertex mesh",
                positions.len(),
                self.mesh.positions.len()
            );
            self.mesh.positions = positions.to_vec();
            self.mesh.normals = normals.to_vec();
        } else {
            self.mesh.positions.copy_from_slice(positions);
            self.mesh.normals.copy_from_slice(normals);
        }
        self.region_writes += 1;
    }

    fn clear(&mut self) {
        self.mesh.positions.clear();
        self.mesh.normals.clear();
        self.mesh.indices.clear();
    }

    fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
    }
}
