//! Shared vertex grid emitter behind every primitive.

use three_core::{BufferAttribute, BufferGeometry, Result};

/// Coordinate axis a grid direction is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    const fn slot(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// One rectangular face subdivided into `grid_x` by `grid_y` cells.
///
/// Grid columns run along `u`, rows along `v`; the face sits at
/// `depth / 2` on `w` and its normal points along `normal_sign` on `w`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Face {
    pub u: Axis,
    pub v: Axis,
    pub w: Axis,
    pub u_dir: f64,
    pub v_dir: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub normal_sign: f64,
    pub grid_x: usize,
    pub grid_y: usize,
}

/// Accumulates faces into flat buffers.
#[derive(Debug, Default)]
pub(crate) struct GridBuilder {
    positions: Vec<f32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
    indices: Vec<u32>,
    groups: Vec<(usize, usize, usize)>,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Emits `face`; with a `material_index` its triangles get a group.
    pub fn push_face(&mut self, face: Face, material_index: Option<usize>) {
        let Face { u, v, w, u_dir, v_dir, width, height, depth, normal_sign, grid_x, grid_y } =
            face;
        let segment_width = width / grid_x as f64;
        let segment_height = height / grid_y as f64;
        let half_width = width / 2.0;
        let half_height = height / 2.0;
        let half_depth = depth / 2.0;
        let grid_x1 = grid_x + 1;

        let base = self.vertex_count();
        let group_start = self.indices.len();

        for iy in 0..=grid_y {
            let y = iy as f64 * segment_height - half_height;
            for ix in 0..=grid_x {
                let x = ix as f64 * segment_width - half_width;

                let mut position = [0.0; 3];
                position[u.slot()] = x * u_dir;
                position[v.slot()] = y * v_dir;
                position[w.slot()] = half_depth;
                self.positions.extend(position.map(|c| c as f32));

                let mut normal = [0.0f32; 3];
                normal[w.slot()] = normal_sign as f32;
                self.normals.extend(normal);

                self.uvs.push((ix as f64 / grid_x as f64) as f32);
                self.uvs.push((1.0 - iy as f64 / grid_y as f64) as f32);
            }
        }

        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = base + ix + grid_x1 * iy;
                let b = base + ix + grid_x1 * (iy + 1);
                let c = base + (ix + 1) + grid_x1 * (iy + 1);
                let d = base + (ix + 1) + grid_x1 * iy;
                self.indices.extend([a, b, d, b, c, d].map(|i| i as u32));
            }
        }

        if let Some(material) = material_index {
            self.groups.push((group_start, self.indices.len() - group_start, material));
        }
    }

    /// Packs the buffers into an indexed geometry.
    pub fn finish(self, name: &str) -> Result<BufferGeometry> {
        let mut geometry = BufferGeometry::new();
        geometry.name = name.to_owned();
        geometry.set_index_from_slice(&self.indices)?;
        geometry
            .add_attribute("position", BufferAttribute::new(self.positions, 3, false)?)?
            .add_attribute("normal", BufferAttribute::new(self.normals, 3, false)?)?
            .add_attribute("uv", BufferAttribute::new(self.uvs, 2, false)?)?;
        for (start, count, material) in self.groups {
            geometry.add_group(start, count, material);
        }
        Ok(geometry)
    }
}
