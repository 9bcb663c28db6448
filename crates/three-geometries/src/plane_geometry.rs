//! Flat rectangle in the XY plane.

use three_core::{BufferGeometry, Result};
use tracing::debug;

use crate::grid::{Axis, Face, GridBuilder};

/// Plane dimensions and subdivision. The built face is centered on the
/// origin and faces +z.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaneGeometry {
    /// Extent along x
    pub width: f64,
    /// Extent along y
    pub height: f64,
    /// Cells along x
    pub width_segments: usize,
    /// Cells along y
    pub height_segments: usize,
}

impl Default for PlaneGeometry {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1, 1)
    }
}

impl PlaneGeometry {
    /// Plane parameters. Zero segments are treated as one.
    pub fn new(width: f64, height: f64, width_segments: usize, height_segments: usize) -> Self {
        Self { width, height, width_segments, height_segments }
    }

    /// Builds indexed `position`, `normal` and `uv` attributes. The plane
    /// has no groups.
    pub fn build(&self) -> Result<BufferGeometry> {
        let grid_x = self.width_segments.max(1);
        let grid_y = self.height_segments.max(1);
        debug!(w = self.width, h = self.height, grid_x, grid_y, "Building plane geometry");

        let mut builder = GridBuilder::new();
        builder.push_face(
            Face {
                u: Axis::X,
                v: Axis::Y,
                w: Axis::Z,
                u_dir: 1.0,
                v_dir: -1.0,
                width: self.width,
                height: self.height,
                depth: 0.0,
                normal_sign: 1.0,
                grid_x,
                grid_y,
            },
            None,
        );
        builder.finish("PlaneGeometry")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use three_math::Vector3;

    #[test]
    fn test_layout() {
        let g = PlaneGeometry::new(4.0, 2.0, 2, 1).build().unwrap();
        let position = g.attribute("position").unwrap();
        assert_eq!(position.count(), 6);
        assert_eq!(g.index().unwrap().count(), 12);
        assert!(g.groups().is_empty());

        // first row is the top edge
        assert_eq!(position.get_vector3(0), Vector3::new(-2.0, 1.0, 0.0));
        assert_eq!(position.get_vector3(5), Vector3::new(2.0, -1.0, 0.0));

        let uv = g.attribute("uv").unwrap();
        assert_eq!((uv.get_x(0), uv.get_y(0)), (0.0, 1.0));
        assert_eq!((uv.get_x(5), uv.get_y(5)), (1.0, 0.0));
    }

    #[test]
    fn test_faces_plus_z() {
        let mut g = PlaneGeometry::default().build().unwrap();
        let built: Vec<f64> = g.attribute("normal").unwrap().array().to_f64_vec();

        g.compute_vertex_normals().unwrap();
        let computed = g.attribute("normal").unwrap().array().to_f64_vec();
        assert_eq!(built, computed);
        assert_eq!(&built[..3], &[0.0, 0.0, 1.0]);
    }
}
