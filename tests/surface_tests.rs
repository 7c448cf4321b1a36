use std::time::Duration;

use glam::Vec3;
use surfmorph3d::surface::{
    ControllerPhase, CoordinateTransform, CpuMesh, GeometryWriter, HeightGrid, Identity,
    ResolvedState, ScaleTransform, StateStore, SurfaceMeshController, TopologyCache,
    compile_height_fn,
};

fn flat(width: usize, depth: usize, height: f32) -> HeightGrid {
    let points = (0..width)
        .flat_map(|x| (0..depth).map(move |z| Vec3::new(x as f32, height, z as f32)))
        .collect();
    HeightGrid::from_points(width, depth, points).unwrap()
}

fn wavy(width: usize, depth: usize, phase: f32) -> HeightGrid {
    HeightGrid::sample(
        |x, z| (x + phase).sin() * z.cos(),
        (-2.0, 2.0),
        width,
        (-1.0, 1.0),
        depth,
    )
    .unwrap()
}

#[test]
fn single_point_keyframe() {
    let mut c = SurfaceMeshController::new(Identity, CpuMesh::new());
    c.add_state(HeightGrid::from_points(1, 1, vec![Vec3::new(0.0, 5.0, 0.0)]).unwrap());
    c.set_progress(2.0);

    let mesh = &c.backend().mesh;
    assert_eq!(mesh.positions, vec![Vec3::new(0.0, 5.0, 0.0)]);
    assert_eq!(mesh.triangle_count(), 0);
    assert_eq!(c.phase(), ControllerPhase::Saturated);
}

#[test]
fn midpoint_blend_of_flat_grids() {
    let mut c = SurfaceMeshController::new(Identity, CpuMesh::new());
    c.add_state(flat(3, 3, 0.0));
    c.add_state(flat(3, 3, 10.0));
    c.set_progress(1.5);

    let mesh = &c.backend().mesh;
    assert_eq!(mesh.vertex_count(), 9);
    assert!(mesh.positions.iter().all(|p| (p.y - 5.0).abs() < 1e-5));
    assert!(mesh.normals.iter().all(|&n| n == Vec3::Y));
}

#[test]
fn half_sweep_of_four_columns() {
    let mut c = SurfaceMeshController::new(Identity, CpuMesh::new());
    c.add_state(flat(4, 4, 0.0));
    c.set_progress(0.5);

    let mesh = &c.backend().mesh;
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.triangle_count(), 6);
    assert_eq!(c.phase(), ControllerPhase::Sweeping);
}

#[test]
fn sweep_vertex_count_is_monotone() {
    let grid = wavy(8, 3, 0.0);
    let writer = GeometryWriter::default();

    let mut previous = 0;
    for step in 0..1000 {
        let fraction = step as f32 / 1000.0;
        let count = writer.build_sweep(&grid, fraction, &Identity).vertex_count();
        assert!(count >= previous, "fraction {fraction}: {count} < {previous}");
        previous = count;
    }
}

#[test]
fn sweep_steps_up_across_column_boundaries() {
    let width = 8;
    let depth = 3;
    let grid = wavy(width, depth, 0.0);
    let writer = GeometryWriter::default();

    for k in 2..width {
        let before = writer.build_sweep(&grid, (k as f32 - 0.01) / width as f32, &Identity);
        let after = writer.build_sweep(&grid, (k as f32 + 0.01) / width as f32, &Identity);
        assert_eq!(before.vertex_count(), k * depth, "before column {k}");
        assert_eq!(after.vertex_count(), (k + 1) * depth, "after column {k}");
    }
}

#[test]
fn saturation_beyond_last_keyframe() {
    let mut store = StateStore::new();
    for i in 0..3 {
        store.add_state(flat(2, 2, i as f32));
    }
    for progress in [3.0, 3.5, 4.0, 100.0, f32::INFINITY] {
        assert_eq!(
            store.resolve(progress),
            ResolvedState::Blend { from: 2, to: 2, t: 0.0 },
            "progress {progress}"
        );
    }
}

#[test]
fn sweep_ends_exactly_at_one() {
    let mut store = StateStore::new();
    store.add_state(flat(2, 2, 0.0));
    store.add_state(flat(2, 2, 1.0));

    assert!(matches!(store.resolve(0.999_999), ResolvedState::Sweep { .. }));
    assert_eq!(
        store.resolve(1.0),
        ResolvedState::Blend { from: 0, to: 0, t: 0.0 }
    );
}

#[test]
fn keyframes_reproduce_transformed_positions() {
    let transform = ScaleTransform::fit((-2.0, 2.0), (-1.0, 1.0), 5.0, 0.5);
    let mut c = SurfaceMeshController::new(transform, CpuMesh::new());
    let grids: Vec<HeightGrid> = (0..3).map(|i| wavy(5, 4, i as f32)).collect();
    for grid in &grids {
        c.add_state(grid.clone());
    }

    for (i, grid) in grids.iter().enumerate() {
        c.set_progress((i + 1) as f32);
        let expected: Vec<Vec3> = grid.points().iter().map(|&p| transform.apply(p)).collect();
        assert_eq!(c.backend().mesh.positions, expected, "keyframe {i}");
    }
}

#[test]
fn ensure_keeps_topology_for_same_dimensions() {
    let mut cache = TopologyCache::new();
    assert!(cache.ensure(6, 4));
    let indices = cache.indices().as_ptr();
    let generation = cache.generation();

    assert!(!cache.ensure(6, 4));
    assert_eq!(cache.indices().as_ptr(), indices);
    assert_eq!(cache.generation(), generation);
    assert_eq!(cache.triangle_count(), 5 * 3 * 2);
}

#[test]
fn steady_blends_only_write_regions() {
    let mut c = SurfaceMeshController::new(Identity, CpuMesh::new());
    for i in 0..3 {
        c.add_state(wavy(6, 6, i as f32));
    }

    c.set_progress(1.1);
    let replacements = c.backend().replacements;
    let generation = c.topology().generation();

    let mut progress = 1.1;
    while progress < 3.0 {
        progress += 0.05;
        c.set_progress(progress);
    }

    assert_eq!(c.backend().replacements, replacements);
    assert_eq!(c.topology().generation(), generation);
    assert!(c.backend().region_writes > 30);
}

#[test]
fn resizing_keyframes_rebuild_topology() {
    let mut c = SurfaceMeshController::new(Identity, CpuMesh::new());
    c.add_state(flat(4, 4, 0.0));
    c.add_state(flat(4, 4, 1.0));
    c.add_state(flat(6, 5, 2.0));

    c.set_progress(1.5);
    let replacements = c.backend().replacements;
    assert_eq!(c.topology().dims(), Some((4, 4)));

    c.set_progress(3.0);
    assert_eq!(c.topology().dims(), Some((6, 5)));
    assert_eq!(c.backend().replacements, replacements + 1);
    assert_eq!(c.backend().mesh.triangle_count(), 5 * 4 * 2);
}

#[test]
fn driving_a_transition_to_completion() {
    let mut c = SurfaceMeshController::new(Identity, CpuMesh::new());
    let height = compile_height_fn("x * z").unwrap();
    c.add_state_from_function(&height, (0.0, 1.0), 4, (0.0, 1.0), 4).unwrap();
    c.add_state(flat(4, 4, 3.0));

    let transition = c.advance_to_next_state(Duration::from_secs(2));
    for ms in (0..=2000).step_by(100) {
        c.set_progress(transition.progress_at(Duration::from_millis(ms)));
    }

    assert_eq!(c.progress(), 2.0);
    assert_eq!(c.phase(), ControllerPhase::Saturated);
    assert!(c.backend().mesh.positions.iter().all(|p| p.y == 3.0));
}
