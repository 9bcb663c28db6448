//! Axis-aligned box centered on the origin.

use three_core::{BufferGeometry, Result};
use tracing::debug;

use crate::grid::{Axis, Face, GridBuilder};

/// Box dimensions and per-axis subdivision.
///
/// A segment count of zero is treated as one.
///
/// # Example
///
/// ```rust
/// use three_geometries::BoxGeometry;
///
/// let geometry = BoxGeometry::new(2.0, 1.0, 1.0, 2, 1, 1).build()?;
/// assert_eq!(geometry.groups().len(), 6);
/// # Ok::<(), three_core::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxGeometry {
    /// Extent along x
    pub width: f64,
    /// Extent along y
    pub height: f64,
    /// Extent along z
    pub depth: f64,
    /// Cells along x
    pub width_segments: usize,
    /// Cells along y
    pub height_segments: usize,
    /// Cells along z
    pub depth_segments: usize,
}

impl Default for BoxGeometry {
    /// Unit cube, one cell per face.
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 1, 1, 1)
    }
}

impl BoxGeometry {
    /// Box parameters.
    pub fn new(
        width: f64,
        height: f64,
        depth: f64,
        width_segments: usize,
        height_segments: usize,
        depth_segments: usize,
    ) -> Self {
        Self { width, height, depth, width_segments, height_segments, depth_segments }
    }

    /// Builds indexed `position`, `normal` and `uv` attributes plus one
    /// group per face, in the order +x, -x, +y, -y, +z, -z with material
    /// indices 0 through 5.
    pub fn build(&self) -> Result<BufferGeometry> {
        let (w, h, d) = (self.width, self.height, self.depth);
        let ws = self.width_segments.max(1);
        let hs = self.height_segments.max(1);
        let ds = self.depth_segments.max(1);
        debug!(w, h, d, ws, hs, ds, "Building box geometry");

        let face = |u, v, axis, u_dir, v_dir, width, height, depth: f64, gx, gy| Face {
            u,
            v,
            w: axis,
            u_dir,
            v_dir,
            width,
            height,
            depth,
            normal_sign: if depth > 0.0 { 1.0 } else { -1.0 },
            grid_x: gx,
            grid_y: gy,
        };
        let (x, y, z) = (Axis::X, Axis::Y, Axis::Z);
        let faces = [
            face(z, y, x, -1.0, -1.0, d, h, w, ds, hs),
            face(z, y, x, 1.0, -1.0, d, h, -w, ds, hs),
            face(x, z, y, 1.0, 1.0, w, d, h, ws, ds),
            face(x, z, y, 1.0, -1.0, w, d, -h, ws, ds),
            face(x, y, z, 1.0, -1.0, w, h, d, ws, hs),
            face(x, y, z, -1.0, -1.0, w, h, -d, ws, hs),
        ];

        let mut builder = GridBuilder::new();
        for (material, face) in faces.into_iter().enumerate() {
            builder.push_face(face, Some(material));
        }
        builder.finish("BoxGeometry")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let g = BoxGeometry::new(1.0, 1.0, 1.0, 2, 3, 4).build().unwrap();
        // (ds+1)(hs+1) twice, (ws+1)(ds+1) twice, (ws+1)(hs+1) twice
        let vertices = 2 * (5 * 4 + 3 * 5 + 3 * 4);
        assert_eq!(g.attribute("position").unwrap().count(), vertices);
        assert_eq!(g.attribute("normal").unwrap().count(), vertices);
        assert_eq!(g.attribute("uv").unwrap().count(), vertices);

        let cells = 2 * (4 * 3 + 2 * 4 + 2 * 3);
        assert_eq!(g.index().unwrap().count(), cells * 6);
        assert_eq!(g.name, "BoxGeometry");
    }

    #[test]
    fn test_zero_segments_mean_one() {
        let g = BoxGeometry::new(1.0, 1.0, 1.0, 0, 0, 0).build().unwrap();
        assert_eq!(g.attribute("position").unwrap().count(), 24);
        assert_eq!(g.index().unwrap().count(), 36);
    }

    #[test]
    fn test_groups_cover_index_in_order() {
        let g = BoxGeometry::new(1.0, 2.0, 3.0, 1, 2, 3).build().unwrap();
        let groups = g.groups();
        assert_eq!(groups.len(), 6);

        let mut expected_start = 0;
        for (i, group) in groups.iter().enumerate() {
            assert_eq!(group.material_index, i);
            assert_eq!(group.start, expected_start);
            expected_start += group.count;
        }
        assert_eq!(expected_start, g.index().unwrap().count());
    }

    #[test]
    fn test_face_normals_point_outward() {
        let g = BoxGeometry::new(2.0, 2.0, 2.0, 1, 1, 1).build().unwrap();
        let normal = g.attribute("normal").unwrap();
        let expected = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        for (face, n) in expected.iter().enumerate() {
            for corner in 0..4 {
                assert_eq!(normal.get_vector3(face * 4 + corner).to_array(), *n);
            }
        }
    }
}
