//! Vertex normals for both mesh paths.
//!
//! The fixed-topology path uses central differences over grid neighbours.
//! The sweep path has a varying column count, so it accumulates face normals
//! over whatever triangles were actually emitted.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Fallback for boundary and degenerate normals.
pub const UP: Vec3 = Vec3::Y;

/// How the grid path treats the first/last row and column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryNormals {
    /// Boundary vertices point straight up.
    #[default]
    Up,
    /// Boundary vertices use a one-sided difference along the clipped axis.
    OneSided,
}

#[inline]
fn normal_or_up(n: Vec3) -> Vec3 {
    n.try_normalize().unwrap_or(UP)
}

/// Writes grid normals for `positions` laid out at `x * depth + z`.
///
/// Interior normals are `normalize((back - front) x (right - left))`, where
/// left/right step along x and front/back step along z.
pub fn grid_normals(
    positions: &[Vec3],
    width: usize,
    depth: usize,
    boundary: BoundaryNormals,
    out: &mut [Vec3],
) {
    debug_assert_eq!(positions.len(), width * depth);
    debug_assert_eq!(out.len(), positions.len());

    if width < 2 || depth < 2 {
        out.fill(UP);
        return;
    }

    let at = |x: usize, z: usize| positions[x * depth + z];

    for x in 0..width {
        for z in 0..depth {
            let interior = x > 0 && x < width - 1 && z > 0 && z < depth - 1;

            out[x * depth + z] = if interior {
                let along_x = at(x + 1, z) - at(x - 1, z);
                let along_z = at(x, z + 1) - at(x, z - 1);
                normal_or_up(along_z.cross(along_x))
            } else {
                match boundary {
                    BoundaryNormals::Up => UP,
                    BoundaryNormals::OneSided => {
                        let along_x = at((x + 1).min(width - 1), z) - at(x.saturating_sub(1), z);
                        let along_z = at(x, (z + 1).min(depth - 1)) - at(x, z.saturating_sub(1));
                        normal_or_up(along_z.cross(along_x))
                    }
                }
            };
        }
    }
}

/// Area-weighted vertex normals accumulated from a triangle list.
pub fn triangle_normals(positions: &[Vec3], indices: &[u32], out: &mut Vec<Vec3>) {
    out.clear();
    out.resize(positions.len(), Vec3::ZERO);

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        // magnitude is twice the triangle area
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        out[a] += face;
        out[b] += face;
        out[c] += face;
    }

    for n in out.iter_mut() {
        *n = normal_or_up(*n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::topology::grid_indices;

    fn plane(width: usize, depth: usize, slope: f32) -> Vec<Vec3> {
        (0..width)
            .flat_map(|x| {
                (0..depth).map(move |z| Vec3::new(x as f32, slope * x as f32, z as f32))
            })
            .collect()
    }

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn flat_grid_points_up() {
        let positions = plane(4, 4, 0.0);
        let mut out = vec![Vec3::ZERO; 16];
        grid_normals(&positions, 4, 4, BoundaryNormals::OneSided, &mut out);
        for n in out {
            assert_close(n, UP);
        }
    }

    #[test]
    fn sloped_interior_tilts_against_slope() {
        let positions = plane(3, 3, 1.0);
        let mut out = vec![Vec3::ZERO; 9];
        grid_normals(&positions, 3, 3, BoundaryNormals::Up, &mut out);

        let expected = Vec3::new(-1.0, 1.0, 0.0).normalize();
        assert_close(out[4], expected);
        assert_eq!(out[0], UP);
        assert_eq!(out[8], UP);
    }

    #[test]
    fn one_sided_boundary_matches_plane() {
        let positions = plane(3, 3, 1.0);
        let mut out = vec![Vec3::ZERO; 9];
        grid_normals(&positions, 3, 3, BoundaryNormals::OneSided, &mut out);

        let expected = Vec3::new(-1.0, 1.0, 0.0).normalize();
        for n in out {
            assert_close(n, expected);
        }
    }

    #[test]
    fn coincident_points_fall_back_to_up() {
        let positions = vec![Vec3::ONE; 9];
        let mut out = vec![Vec3::ZERO; 9];
        grid_normals(&positions, 3, 3, BoundaryNormals::OneSided, &mut out);
        assert!(out.iter().all(|&n| n == UP));

        let mut tri_out = Vec::new();
        triangle_normals(&positions, &grid_indices(3, 3), &mut tri_out);
        assert!(tri_out.iter().all(|&n| n == UP));
    }

    #[test]
    fn single_row_grid_is_all_up() {
        let positions = plane(4, 1, 2.0);
        let mut out = vec![Vec3::ZERO; 4];
        grid_normals(&positions, 4, 1, BoundaryNormals::OneSided, &mut out);
        assert!(out.iter().all(|&n| n == UP));
    }

    #[test]
    fn triangle_normals_agree_with_grid_on_plane() {
        let positions = plane(3, 4, 0.5);
        let mut tri_out = Vec::new();
        triangle_normals(&positions, &grid_indices(3, 4), &mut tri_out);

        let expected = Vec3::new(-0.5, 1.0, 0.0).normalize();
        assert_eq!(tri_out.len(), positions.len());
        for n in tri_out {
            assert_close(n, expected);
        }
    }
}
