//! Renderer interface and a headless implementation.

use three_core::{Box3Ext, Error as CoreError};
use three_math::{Box3, Matrix4, Projector, Vector2, Vector3};
use tracing::{debug, trace};

use crate::{NodeId, Result, Scene};

/// Draws a [`Scene`] as seen from a camera.
pub trait Renderer {
    /// Renders one frame.
    ///
    /// Implementations must not mutate the scene. When
    /// [`Scene::auto_update`] is set they use world matrices derived from
    /// the current local transforms instead of the cached ones.
    fn render(&mut self, scene: &Scene, camera: &dyn Projector) -> Result<()>;
}

/// What a [`DryRunRenderer`] would have drawn for one mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Node carrying the mesh
    pub node: NodeId,
    /// Object name
    pub name: String,
    /// Axis-aligned world-space bounds of the geometry
    pub world_bounds: Box3,
    /// Pixel position of the bounds center, origin top-left
    pub screen: Vector2,
    /// Center lies between the near and far planes
    pub in_depth_range: bool,
    /// Elements drawn: indices if indexed, vertices otherwise
    pub elements: usize,
}

/// Renderer that records draw calls instead of rasterizing.
#[derive(Debug, Clone)]
pub struct DryRunRenderer {
    width: u32,
    height: u32,
    frames: u64,
    draws: Vec<DrawCall>,
}

impl DryRunRenderer {
    /// Renderer for a `width` x `height` viewport.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, frames: 0, draws: Vec::new() }
    }

    /// Viewport size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Resizes the viewport.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw calls of the last frame.
    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    fn to_screen(&self, ndc: Vector3) -> Vector2 {
        Vector2::new(
            (ndc.x + 1.0) * 0.5 * f64::from(self.width),
            (1.0 - ndc.y) * 0.5 * f64::from(self.height),
        )
    }
}

impl Renderer for DryRunRenderer {
    fn render(&mut self, scene: &Scene, camera: &dyn Projector) -> Result<()> {
        self.draws.clear();
        self.frames += 1;
        debug!(
            frame = self.frames,
            background = %scene.background.get_hex_string(),
            "Clearing viewport"
        );

        for id in scene.meshes() {
            let Some(object) = scene.object(id) else { continue };
            let Some(mesh) = object.mesh.as_ref() else { continue };
            let geometry = &mesh.geometry;

            let Some(position) = geometry.attribute("position") else {
                trace!(node = %id, name = %object.name, "Skipping mesh without positions");
                continue;
            };
            if position.item_size() < 3 {
                return Err(CoreError::ItemSizeMismatch {
                    expected: 3,
                    actual: position.item_size(),
                }
                .into());
            }

            let world: Matrix4 = if scene.auto_update {
                scene.graph().compute_world_matrix(id)?
            } else {
                *object.matrix_world()
            };

            let mut bounds = match geometry.bounding_box() {
                Some(cached) => *cached,
                None => {
                    let mut b = Box3::EMPTY;
                    b.set_from_buffer_attribute(position);
                    b
                }
            };
            if bounds.is_empty() {
                trace!(node = %id, name = %object.name, "Skipping empty mesh");
                continue;
            }
            bounds.apply_matrix4(&world);

            let mut ndc = bounds.center();
            ndc.project(camera);
            let screen = self.to_screen(ndc);
            let elements = match geometry.index() {
                Some(index) => index.count(),
                None => position.count(),
            };

            debug!(
                node = %id,
                name = %object.name,
                min = ?bounds.min.to_array(),
                max = ?bounds.max.to_array(),
                x = screen.x,
                y = screen.y,
                elements,
                "Drawing mesh"
            );
            self.draws.push(DrawCall {
                node: id,
                name: object.name.clone(),
                world_bounds: bounds,
                screen,
                in_depth_range: (-1.0..=1.0).contains(&ndc.z),
                elements,
            });
        }
        Ok(())
    }
}
