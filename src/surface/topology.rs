use glam::Vec3;

/// Triangle list for a `width x depth` grid laid out at `x * depth + z`.
///
/// Each cell splits along the diagonal from `(x, z)` to `(x + 1, z + 1)`.
/// Both triangles wind counter-clockwise when viewed from +Y with x along
/// +X and z along +Z.
pub fn grid_indices(width: usize, depth: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(grid_triangle_count(width, depth) * 3);
    if width < 2 || depth < 2 {
        return indices;
    }

    for x in 0..width - 1 {
        for z in 0..depth - 1 {
            let a = (x * depth + z) as u32;
            let b = (x * depth + z + 1) as u32;
            let c = ((x + 1) * depth + z) as u32;
            let e = ((x + 1) * depth + z + 1) as u32;

            indices.extend_from_slice(&[a, b, e]);
            indices.extend_from_slice(&[a, e, c]);
        }
    }

    indices
}

pub fn grid_triangle_count(width: usize, depth: usize) -> usize {
    2 * width.saturating_sub(1) * depth.saturating_sub(1)
}

/// Reusable buffers for the fixed-topology path.
///
/// Only [`TopologyCache::ensure`] changes buffer sizes or the index list.
/// Everything else writes into the existing allocations.
#[derive(Debug, Default)]
pub struct TopologyCache {
    dims: Option<(usize, usize)>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    generation: u64,
}

impl TopologyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes the buffers for `(width, depth)`. Returns `true` when a rebuild
    /// happened; previous contents are gone in that case.
    pub fn ensure(&mut self, width: usize, depth: usize) -> bool {
        if self.dims == Some((width, depth)) {
            return false;
        }

        let vertex_count = width * depth;
        self.positions = vec![Vec3::ZERO; vertex_count];
        self.normals = vec![Vec3::Y; vertex_count];
        self.indices = grid_indices(width, depth);
        self.dims = Some((width, depth));
        self.generation += 1;

        log::debug!(
            "topology rebuilt for {}x{} ({} triangles, generation {})",
            width,
            depth,
            self.triangle_count(),
            self.generation
        );
        true
    }

    pub fn dims(&self) -> Option<(usize, usize)> {
        self.dims
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Content access for writers. Lengths stay fixed until the next rebuild.
    pub(crate) fn buffers_mut(&mut self) -> (&mut [Vec3], &mut [Vec3]) {
        (&mut self.positions, &mut self.normals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_cover_every_cell_twice() {
        let indices = grid_indices(3, 4);
        assert_eq!(indices.len(), 2 * 2 * 3 * 3);
        assert_eq!(&indices[..6], &[0, 1, 5, 0, 5, 4]);
        assert!(indices.iter().all(|&i| i < 12));
    }

    #[test]
    fn degenerate_dims_have_no_triangles() {
        assert!(grid_indices(1, 1).is_empty());
        assert!(grid_indices(5, 1).is_empty());
        assert_eq!(grid_triangle_count(1, 7), 0);
        assert_eq!(grid_triangle_count(0, 0), 0);
    }

    #[test]
    fn winding_faces_up() {
        let positions: Vec<Vec3> = (0..2)
            .flat_map(|x| (0..2).map(move |z| Vec3::new(x as f32, 0.0, z as f32)))
            .collect();
        for tri in grid_indices(2, 2).chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| positions[i as usize]);
            let n = (b - a).cross(c - a);
            assert!(n.y > 0.0, "triangle {tri:?} faces {n}");
        }
    }

    #[test]
    fn ensure_same_dims_keeps_allocation() {
        let mut cache = TopologyCache::new();
        assert!(cache.ensure(4, 5));
        let indices_ptr = cache.indices().as_ptr();
        let positions_ptr = cache.positions().as_ptr();
        let generation = cache.generation();

        assert!(!cache.ensure(4, 5));
        assert_eq!(cache.indices().as_ptr(), indices_ptr);
        assert_eq!(cache.positions().as_ptr(), positions_ptr);
        assert_eq!(cache.generation(), generation);
    }

    #[test]
    fn ensure_new_dims_rebuilds() {
        let mut cache = TopologyCache::new();
        cache.ensure(2, 2);
        let generation = cache.generation();

        assert!(cache.ensure(3, 3));
        assert_eq!(cache.generation(), generation + 1);
        assert_eq!(cache.vertex_count(), 9);
        assert_eq!(cache.triangle_count(), 8);
        assert_eq!(cache.normals().len(), 9);
    }
}
