//! Render command.
//!
//! Lays out a row of spinning boxes over a ground plane and draws it with
//! the [`DryRunRenderer`], printing each recorded draw call.

use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

use anyhow::{Context, Result};
use three_geometries::{BoxGeometry, PlaneGeometry};
use three_scene::prelude::*;
use tracing::info;

use crate::RenderArgs;

const SPACING: f64 = 2.0;

/// Demo scene: `count` unit boxes under a shared pivot, spaced along x and
/// turned a little more each, above a ground plane.
pub fn demo_scene(count: usize) -> Result<Scene> {
    let cube = Arc::new(BoxGeometry::default().build().context("Failed to build box")?);
    let extent = (count.max(1) as f64) * SPACING;
    let ground = Arc::new(
        PlaneGeometry::new(extent + SPACING, SPACING * 2.0, 1, 1)
            .build()
            .context("Failed to build ground plane")?,
    );

    let mut scene = Scene::new();
    scene.background.set_hex(0x202020);

    let floor = scene.add(Object3D::with_mesh("ground", Mesh::new(ground)));
    if let Some(object) = scene.object_mut(floor) {
        object.rotate_x(-FRAC_PI_2).set_position(Vector3::new(0.0, -0.5, 0.0));
    }

    let pivot = scene.add(Object3D::named("pivot"));
    let first = -(count.saturating_sub(1) as f64) * SPACING / 2.0;
    for i in 0..count {
        let mut object = Object3D::with_mesh(format!("box{i}"), Mesh::new(Arc::clone(&cube)));
        object
            .set_position(Vector3::new(first + i as f64 * SPACING, 0.0, 0.0))
            .rotate_y(i as f64 * 0.25);
        scene.add_child(pivot, object)?;
    }
    scene.update_matrix_world()?;
    Ok(scene)
}

/// Runs the render command.
pub fn run(args: RenderArgs, verbose: bool) -> Result<()> {
    let scene = demo_scene(args.count)?;
    let aspect = f64::from(args.width) / f64::from(args.height.max(1));
    let eye = Vector3::new(0.0, 3.0, 10.0);

    let mut perspective;
    let mut orthographic;
    let camera: &dyn Projector = if args.ortho {
        let half_w = (args.count.max(1) as f64) * SPACING / 2.0 + SPACING;
        let half_h = half_w / aspect;
        orthographic = OrthographicCamera::new(-half_w, half_w, half_h, -half_h, 0.1, 100.0);
        orthographic.object.set_position(eye);
        orthographic.look_at(Vector3::ZERO);
        &orthographic
    } else {
        perspective = PerspectiveCamera::new(50.0, aspect, 0.1, 100.0);
        perspective.object.set_position(eye);
        perspective.look_at(Vector3::ZERO);
        &perspective
    };

    let mut renderer = DryRunRenderer::new(args.width, args.height);
    renderer.render(&scene, camera).context("Render failed")?;
    info!(draws = renderer.draws().len(), "Frame complete");

    println!(
        "Frame {} ({}x{}), background #{}",
        renderer.frames(),
        args.width,
        args.height,
        scene.background.get_hex_string()
    );
    for draw in renderer.draws() {
        let clip = if draw.in_depth_range { "" } else { " (clipped)" };
        println!(
            "  {:<8} at ({:>7.1}, {:>7.1}) {:>5} elements{}",
            draw.name, draw.screen.x, draw.screen.y, draw.elements, clip
        );
        if verbose {
            println!(
                "           bounds {} .. {}",
                super::format_xyz(draw.world_bounds.min.to_array()),
                super::format_xyz(draw.world_bounds.max.to_array())
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scene_layout() {
        let scene = demo_scene(3).unwrap();
        // root, ground, pivot, three boxes
        assert_eq!(scene.graph().len(), 6);
        assert_eq!(scene.meshes().count(), 4);

        let xs: Vec<f64> = scene
            .meshes()
            .skip(1)
            .map(|id| scene.object(id).unwrap().world_position().x)
            .collect();
        assert_eq!(xs, [-2.0, 0.0, 2.0]);
    }

    #[test]
    fn test_boxes_render_left_to_right() {
        let scene = demo_scene(4).unwrap();
        let mut camera = PerspectiveCamera::new(50.0, 1.0, 0.1, 100.0);
        camera.object.set_position(Vector3::new(0.0, 3.0, 10.0));
        camera.look_at(Vector3::ZERO);

        let mut renderer = DryRunRenderer::new(100, 100);
        renderer.render(&scene, &camera).unwrap();

        let boxes: Vec<&DrawCall> =
            renderer.draws().iter().filter(|d| d.name.starts_with("box")).collect();
        assert_eq!(boxes.len(), 4);
        assert!(boxes.windows(2).all(|w| w[0].screen.x < w[1].screen.x));
        assert!(boxes.iter().all(|d| d.in_depth_range));
    }
}
