//! Hierarchy behaviour seen through the public API: nested transforms,
//! re-parenting and a full render pass.

use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use three_core::{BufferAttribute, BufferGeometry};
use three_scene::prelude::*;

// ============================================================================
// Fixtures
// ============================================================================

/// Unit cube corners, enough for bounds.
const CUBE_CORNERS: [f32; 24] = [
    -0.5, -0.5, -0.5, //
    0.5, -0.5, -0.5, //
    -0.5, 0.5, -0.5, //
    0.5, 0.5, -0.5, //
    -0.5, -0.5, 0.5, //
    0.5, -0.5, 0.5, //
    -0.5, 0.5, 0.5, //
    0.5, 0.5, 0.5, //
];

fn cube() -> Arc<BufferGeometry> {
    let mut g = BufferGeometry::new();
    let position = BufferAttribute::new(CUBE_CORNERS.to_vec(), 3, false).unwrap();
    g.add_attribute("position", position).unwrap();
    g.compute_bounding_box();
    Arc::new(g)
}

/// sun -> earth -> moon, each offset along +x from its parent.
fn solar_system() -> (Scene, NodeId, NodeId, NodeId) {
    let mut scene = Scene::new();
    let sun = scene.add(Object3D::with_mesh("sun", Mesh::new(cube())));
    let earth = scene.add_child(sun, Object3D::with_mesh("earth", Mesh::new(cube()))).unwrap();
    let moon = scene.add_child(earth, Object3D::with_mesh("moon", Mesh::new(cube()))).unwrap();

    scene.object_mut(earth).unwrap().set_position(Vector3::new(10.0, 0.0, 0.0));
    scene.object_mut(moon).unwrap().set_position(Vector3::new(2.0, 0.0, 0.0));
    (scene, sun, earth, moon)
}

fn world(scene: &Scene, id: NodeId) -> [f64; 3] {
    scene.object(id).unwrap().world_position().to_array()
}

// ============================================================================
// Transforms
// ============================================================================

#[test]
fn rotation_carries_through_the_hierarchy() {
    let (mut scene, sun, earth, moon) = solar_system();
    scene.object_mut(sun).unwrap().rotate_y(FRAC_PI_2);
    scene.update_matrix_world().unwrap();

    // +x rotated a quarter turn about y lands on -z
    assert_abs_diff_eq!(world(&scene, earth)[..], [0.0, 0.0, -10.0][..], epsilon = 1e-12);
    assert_abs_diff_eq!(world(&scene, moon)[..], [0.0, 0.0, -12.0][..], epsilon = 1e-12);
}

#[test]
fn scale_applies_to_child_offsets() {
    let (mut scene, sun, _, moon) = solar_system();
    scene.object_mut(sun).unwrap().set_scale(Vector3::splat(0.5));
    scene.update_matrix_world().unwrap();
    assert_abs_diff_eq!(world(&scene, moon)[..], [6.0, 0.0, 0.0][..], epsilon = 1e-12);
}

#[test]
fn reparenting_moves_the_subtree() {
    let (mut scene, sun, earth, moon) = solar_system();
    let root = scene.root();
    scene.graph_mut().add(root, moon).unwrap();

    assert_eq!(scene.graph().children(earth), &[] as &[NodeId]);
    assert_eq!(scene.graph().children(root), &[sun, moon]);

    scene.update_matrix_world().unwrap();
    assert_eq!(world(&scene, moon), [2.0, 0.0, 0.0]);
}

#[test]
fn cycles_are_refused() {
    let (mut scene, sun, _, moon) = solar_system();
    scene.graph_mut().add(moon, sun).unwrap();
    assert_eq!(scene.graph().parent(sun), Some(scene.root()));
    assert_eq!(scene.graph().traverse(scene.root()).len(), 4);
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn dry_run_records_visible_meshes() {
    let (mut scene, _, earth, moon) = solar_system();
    scene.object_mut(earth).unwrap().visible = false;
    scene.update_matrix_world().unwrap();

    let mut camera = PerspectiveCamera::new(60.0, 1.0, 0.1, 100.0);
    camera.object.set_position(Vector3::new(0.0, 0.0, 20.0));
    camera.look_at(Vector3::ZERO);

    let mut renderer = DryRunRenderer::new(320, 320);
    renderer.render(&scene, &camera).unwrap();

    // earth hides the moon with it
    let names: Vec<_> = renderer.draws().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["sun"]);
    assert!(renderer.draws().iter().all(|d| d.node != moon));

    let sun = &renderer.draws()[0];
    assert_abs_diff_eq!(sun.screen.x, 160.0, epsilon = 1e-9);
    assert_abs_diff_eq!(sun.screen.y, 160.0, epsilon = 1e-9);
    assert_eq!(sun.world_bounds.size(), Vector3::ONE);
}

#[test]
fn orthographic_camera_maps_offsets_linearly() {
    let (mut scene, _, _, _) = solar_system();
    scene.update_matrix_world().unwrap();

    let mut camera = OrthographicCamera::new(-20.0, 20.0, 20.0, -20.0, 0.1, 100.0);
    camera.object.set_position(Vector3::new(0.0, 0.0, 50.0));
    camera.look_at(Vector3::ZERO);

    let mut renderer = DryRunRenderer::new(400, 400);
    renderer.render(&scene, &camera).unwrap();

    let xs: Vec<f64> = renderer.draws().iter().map(|d| d.screen.x).collect();
    // 40 world units across 400 pixels
    assert_abs_diff_eq!(xs[..], [200.0, 300.0, 320.0][..], epsilon = 1e-9);
}
