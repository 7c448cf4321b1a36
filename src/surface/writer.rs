use glam::Vec3;

use crate::surface::grid::HeightGrid;
use crate::surface::mesh::TriangleMesh;
use crate::surface::normals::{BoundaryNormals, grid_normals, triangle_normals};
use crate::surface::topology::{TopologyCache, grid_indices};
use crate::surface::transform::CoordinateTransform;

/// Computes positions and normals for resolved states.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryWriter {
    pub boundary: BoundaryNormals,
}

impl GeometryWriter {
    pub fn new(boundary: BoundaryNormals) -> Self {
        Self { boundary }
    }

    /// Writes `lerp(from, to, t)` into the cache's persistent buffers.
    ///
    /// Blends over the smaller of the two grids on each axis. Returns whether
    /// the topology had to be rebuilt.
    pub fn write_blend<T>(
        &self,
        cache: &mut TopologyCache,
        from: &HeightGrid,
        to: &HeightGrid,
        t: f32,
        transform: &T,
    ) -> bool
    where
        T: CoordinateTransform + ?Sized,
    {
        let width = from.width().min(to.width());
        let depth = from.depth().min(to.depth());
        if from.dims() != to.dims() {
            log::debug!(
                "blending {:?} with {:?}, truncated to {}x{}",
                from.dims(),
                to.dims(),
                width,
                depth
            );
        }

        let rebuilt = cache.ensure(width, depth);
        let (positions, normals) = cache.buffers_mut();
        let same = std::ptr::eq(from, to) || t == 0.0;

        for x in 0..width {
            for z in 0..depth {
                let data = if same {
                    from.get(x, z)
                } else {
                    from.get(x, z).lerp(to.get(x, z), t)
                };
                positions[x * depth + z] = transform.apply(data);
            }
        }

        grid_normals(positions, width, depth, self.boundary, normals);
        rebuilt
    }

    /// Builds the partially revealed mesh of `grid` for `fraction` in `[0, 1)`.
    pub fn build_sweep<T>(&self, grid: &HeightGrid, fraction: f32, transform: &T) -> TriangleMesh
    where
        T: CoordinateTransform + ?Sized,
    {
        let mut mesh = TriangleMesh::default();
        if fraction.is_nan() || fraction <= 0.0 {
            return mesh;
        }

        let (width, depth) = grid.dims();
        let span = width as f32 * fraction;
        let visible = (span.floor() as usize).min(width);
        let edge = span - span.floor();

        if width == 1 {
            push_column(&mut mesh, grid.column(0).iter().copied(), transform);
        } else if visible < 2 {
            push_column(&mut mesh, grid.column(0).iter().copied(), transform);
            push_column(
                &mut mesh,
                lerp_columns(grid.column(0), grid.column(1), span / 2.0),
                transform,
            );
        } else {
            for x in 0..visible {
                push_column(&mut mesh, grid.column(x).iter().copied(), transform);
            }
            if edge > 0.0 && visible < width {
                push_column(
                    &mut mesh,
                    lerp_columns(grid.column(visible - 1), grid.column(visible), edge),
                    transform,
                );
            }
        }

        let columns = mesh.positions.len() / depth;
        mesh.indices = grid_indices(columns, depth);
        triangle_normals(&mesh.positions, &mesh.indices, &mut mesh.normals);
        mesh
    }
}

fn push_column<T, I>(mesh: &mut TriangleMesh, column: I, transform: &T)
where
    T: CoordinateTransform + ?Sized,
    I: Iterator<Item = Vec3>,
{
    mesh.positions.extend(column.map(|p| transform.apply(p)));
}

fn lerp_columns<'a>(a: &'a [Vec3], b: &'a [Vec3], t: f32) -> impl Iterator<Item = Vec3> + 'a {
    a.iter().zip(b).map(move |(p, q)| p.lerp(*q, t))
}
