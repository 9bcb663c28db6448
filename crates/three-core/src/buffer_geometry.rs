//! Mesh data: named attributes, an optional index and material groups.
//!
//! A [`BufferGeometry`] owns everything it references. Bounding volumes are
//! cached on request and refreshed by [`BufferGeometry::apply_matrix`]; any
//! other edit to the position data needs an explicit recompute.
//!
//! # Well-known attribute names
//!
//! - `"position"` - vertex positions (`item_size == 3`), used for bounds
//!   and normals
//! - `"normal"` - vertex normals, created by
//!   [`BufferGeometry::compute_vertex_normals`]
//! - `"uv"`, `"color"` - passed through untouched
//!
//! The index is not an attribute; the name `"index"` is reserved.
//!
//! # Usage
//!
//! ```rust
//! use three_core::{BufferAttribute, BufferGeometry};
//!
//! let mut quad = BufferGeometry::new();
//! quad.add_attribute(
//!     "position",
//!     BufferAttribute::new(
//!         vec![0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
//!         3,
//!         false,
//!     )
//!     .unwrap(),
//! )
//! .unwrap();
//! quad.set_index_from_slice(&[0, 1, 2, 0, 2, 3]).unwrap();
//! quad.compute_vertex_normals().unwrap();
//!
//! assert_eq!(quad.attribute("normal").unwrap().get_z(0), 1.0);
//! ```

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use three_math::{Box3, Matrix3, Matrix4, Sphere, Vector3, generate_uuid};
use tracing::{debug, warn};

use crate::{ArrayKind, BufferAttribute, Error, Result, TypedArray};

/// Largest index value a `Uint16` index buffer can hold.
pub const MAX_UINT16_INDEX: u32 = u16::MAX as u32;

/// Name under which nothing may be stored in the attribute map.
pub const INDEX_ATTRIBUTE_NAME: &str = "index";

static NEXT_GEOMETRY_ID: AtomicU64 = AtomicU64::new(0);

/// Range of the index (or of the vertices) drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    /// First index
    pub start: usize,
    /// Number of indices
    pub count: usize,
    /// Material slot used for this range
    pub material_index: usize,
}

/// Part of the geometry to draw; `count == None` means to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawRange {
    /// First index (or vertex)
    pub start: usize,
    /// Number of indices, or `None` for all
    pub count: Option<usize>,
}

/// Fills a [`Box3`] from attribute data.
pub trait Box3Ext {
    /// Fits the first three components of every element of `attribute`.
    fn set_from_buffer_attribute(&mut self, attribute: &BufferAttribute) -> &mut Self;
}

impl Box3Ext for Box3 {
    fn set_from_buffer_attribute(&mut self, attribute: &BufferAttribute) -> &mut Self {
        self.set_from_array(&attribute.xyz_values())
    }
}

/// Vertex data for one mesh.
///
/// Cloning copies the id and uuid as well.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferGeometry {
    id: u64,
    uuid: String,
    /// Free-form label
    pub name: String,
    index: Option<BufferAttribute>,
    attributes: BTreeMap<String, BufferAttribute>,
    morph_attributes: BTreeMap<String, Vec<BufferAttribute>>,
    groups: Vec<Group>,
    bounding_box: Option<Box3>,
    bounding_sphere: Option<Sphere>,
    draw_range: DrawRange,
}

impl Default for BufferGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferGeometry {
    /// Empty geometry with a fresh id and uuid.
    pub fn new() -> Self {
        Self {
            id: NEXT_GEOMETRY_ID.fetch_add(1, Ordering::Relaxed),
            uuid: generate_uuid(),
            name: String::new(),
            index: None,
            attributes: BTreeMap::new(),
            morph_attributes: BTreeMap::new(),
            groups: Vec::new(),
            bounding_box: None,
            bounding_sphere: None,
            draw_range: DrawRange::default(),
        }
    }

    /// Process-wide sequence number.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Unique identifier.
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    // ------------------------------------------------------------------
    // Index
    // ------------------------------------------------------------------

    /// Index buffer, if the geometry is indexed.
    pub fn index(&self) -> Option<&BufferAttribute> {
        self.index.as_ref()
    }

    /// Mutable index buffer.
    pub fn index_mut(&mut self) -> Option<&mut BufferAttribute> {
        self.index.as_mut()
    }

    /// Replaces (or removes) the index buffer.
    pub fn set_index(&mut self, index: Option<BufferAttribute>) -> &mut Self {
        self.index = index;
        self
    }

    /// Builds the index buffer from `indices`.
    ///
    /// Uses `Uint32` storage when any value exceeds [`MAX_UINT16_INDEX`],
    /// `Uint16` otherwise.
    pub fn set_index_from_slice(&mut self, indices: &[u32]) -> Result<&mut Self> {
        let max = indices.iter().copied().max().unwrap_or(0);
        let array = if max > MAX_UINT16_INDEX {
            TypedArray::Uint32(indices.to_vec())
        } else {
            TypedArray::Uint16(indices.iter().map(|&i| i as u16).collect())
        };
        self.index = Some(BufferAttribute::new(array, 1, false)?);
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Stores `attribute` under `name`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// [`Error::ReservedAttributeName`] for `"index"`; use
    /// [`Self::set_index`] instead.
    pub fn add_attribute(&mut self, name: impl Into<String>, attribute: BufferAttribute) -> Result<&mut Self> {
        let name = name.into();
        if name == INDEX_ATTRIBUTE_NAME {
            return Err(Error::ReservedAttributeName(name));
        }
        self.attributes.insert(name, attribute);
        Ok(self)
    }

    /// Attribute stored under `name`.
    pub fn attribute(&self, name: &str) -> Option<&BufferAttribute> {
        self.attributes.get(name)
    }

    /// Mutable attribute stored under `name`.
    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut BufferAttribute> {
        self.attributes.get_mut(name)
    }

    /// Removes and returns the attribute stored under `name`.
    pub fn remove_attribute(&mut self, name: &str) -> Option<BufferAttribute> {
        self.attributes.remove(name)
    }

    /// All attributes, ordered by name.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &BufferAttribute)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Stores the morph targets for attribute `name`.
    pub fn add_morph_attribute(&mut self, name: impl Into<String>, targets: Vec<BufferAttribute>) -> &mut Self {
        self.morph_attributes.insert(name.into(), targets);
        self
    }

    /// Morph targets for attribute `name`.
    pub fn morph_attribute(&self, name: &str) -> Option<&[BufferAttribute]> {
        self.morph_attributes.get(name).map(Vec::as_slice)
    }

    // ------------------------------------------------------------------
    // Groups and draw range
    // ------------------------------------------------------------------

    /// Material groups in insertion order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Appends a material group.
    pub fn add_group(&mut self, start: usize, count: usize, material_index: usize) -> &mut Self {
        self.groups.push(Group { start, count, material_index });
        self
    }

    /// Removes all material groups.
    pub fn clear_groups(&mut self) -> &mut Self {
        self.groups.clear();
        self
    }

    /// Range drawn by a renderer.
    pub fn draw_range(&self) -> DrawRange {
        self.draw_range
    }

    /// Restricts drawing to `count` indices from `start`.
    pub fn set_draw_range(&mut self, start: usize, count: Option<usize>) -> &mut Self {
        self.draw_range = DrawRange { start, count };
        self
    }

    /// Cached bounding box from the last [`Self::compute_bounding_box`].
    pub fn bounding_box(&self) -> Option<&Box3> {
        self.bounding_box.as_ref()
    }

    /// Cached bounding sphere from the last [`Self::compute_bounding_sphere`].
    pub fn bounding_sphere(&self) -> Option<&Sphere> {
        self.bounding_sphere.as_ref()
    }

    // ------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------

    /// Transforms positions by `m` and normals by its normal matrix.
    ///
    /// Cached bounding volumes are recomputed. Both attributes are checked
    /// before either is touched.
    ///
    /// # Errors
    ///
    /// [`Error::ItemSizeMismatch`] if `"position"` or `"normal"` has fewer
    /// than three components.
    pub fn apply_matrix(&mut self, m: &Matrix4) -> Result<&mut Self> {
        for name in ["position", "normal"] {
            match self.attributes.get(name) {
                Some(attr) if attr.item_size() < 3 => {
                    return Err(Error::ItemSizeMismatch { expected: 3, actual: attr.item_size() });
                }
                _ => {}
            }
        }

        if let Some(position) = self.attributes.get_mut("position") {
            position.apply_matrix4(m)?.set_needs_update(true);
        }
        if let Some(normal) = self.attributes.get_mut("normal") {
            let mut normal_matrix = Matrix3::IDENTITY;
            normal_matrix.get_normal_matrix(m);
            normal.apply_normal_matrix(&normal_matrix)?.set_needs_update(true);
        }

        if self.bounding_box.is_some() {
            self.compute_bounding_box();
        }
        if self.bounding_sphere.is_some() {
            self.compute_bounding_sphere();
        }
        Ok(self)
    }

    /// Rotates around the X axis.
    pub fn rotate_x(&mut self, angle: f64) -> Result<&mut Self> {
        let mut m = Matrix4::IDENTITY;
        m.make_rotation_x(angle);
        self.apply_matrix(&m)
    }

    /// Rotates around the Y axis.
    pub fn rotate_y(&mut self, angle: f64) -> Result<&mut Self> {
        let mut m = Matrix4::IDENTITY;
        m.make_rotation_y(angle);
        self.apply_matrix(&m)
    }

    /// Rotates around the Z axis.
    pub fn rotate_z(&mut self, angle: f64) -> Result<&mut Self> {
        let mut m = Matrix4::IDENTITY;
        m.make_rotation_z(angle);
        self.apply_matrix(&m)
    }

    /// Moves every vertex by `(x, y, z)`.
    pub fn translate(&mut self, x: f64, y: f64, z: f64) -> Result<&mut Self> {
        let mut m = Matrix4::IDENTITY;
        m.make_translation(x, y, z);
        self.apply_matrix(&m)
    }

    /// Scales every vertex about the origin.
    pub fn scale(&mut self, x: f64, y: f64, z: f64) -> Result<&mut Self> {
        let mut m = Matrix4::IDENTITY;
        m.make_scale(x, y, z);
        self.apply_matrix(&m)
    }

    /// Rotates the geometry so its +Z axis points at `target`.
    pub fn look_at(&mut self, target: Vector3) -> Result<&mut Self> {
        let mut m = Matrix4::IDENTITY;
        m.look_at(target, Vector3::ZERO, Vector3::Y);
        self.apply_matrix(&m)
    }

    /// Moves the bounding box center to the origin.
    ///
    /// Returns the applied offset. Geometry without positions stays put.
    pub fn center(&mut self) -> Result<Vector3> {
        self.compute_bounding_box();
        let offset = match self.bounding_box {
            Some(bounds) if !bounds.is_empty() => {
                let mut offset = bounds.center();
                offset.negate();
                offset
            }
            _ => Vector3::ZERO,
        };
        self.translate(offset.x, offset.y, offset.z)?;
        Ok(offset)
    }

    // ------------------------------------------------------------------
    // Derived data
    // ------------------------------------------------------------------

    /// Recomputes the cached bounding box from `"position"`.
    ///
    /// Without positions the box is empty. `NaN` coordinates are skipped
    /// and reported with a warning.
    pub fn compute_bounding_box(&mut self) -> &mut Self {
        let mut bounds = Box3::EMPTY;
        if let Some(position) = self.attributes.get("position") {
            bounds.set_from_buffer_attribute(position);
            if position.array().iter().any(f64::is_nan) {
                warn!(geometry = self.id, "Position attribute contains NaN values, bounding box ignores them");
            }
        }
        self.bounding_box = Some(bounds);
        self
    }

    /// Recomputes the cached bounding sphere from `"position"`.
    ///
    /// The center is the bounding box center and the radius reaches the
    /// farthest vertex, which is looser than the minimal sphere.
    pub fn compute_bounding_sphere(&mut self) -> &mut Self {
        let mut sphere = Sphere::default();
        let points = match self.attributes.get("position") {
            Some(position) => position.xyz_values(),
            None => Vec::new(),
        };
        if !points.is_empty() {
            let mut bounds = Box3::EMPTY;
            bounds.set_from_array(&points);
            let center = bounds.center();
            sphere.set(center, max_distance_sq(&points, center).sqrt());

            if points.iter().any(|v| v.is_nan()) {
                warn!(geometry = self.id, "Position attribute contains NaN values, bounding sphere ignores them");
            }
        }
        self.bounding_sphere = Some(sphere);
        self
    }

    /// Computes smooth vertex normals into `"normal"`.
    ///
    /// Indexed geometry accumulates the face normal of every triangle into
    /// its three corners, group by group (one implicit group over the whole
    /// index if there are none), then normalizes. Non-indexed geometry
    /// takes every three vertices as a flat triangle. Vertices no triangle
    /// references get a zero normal.
    ///
    /// Does nothing without a `"position"` attribute.
    ///
    /// # Errors
    ///
    /// - [`Error::ItemSizeMismatch`] if positions don't have three components
    /// - [`Error::OutOfRange`] if an index points past the last vertex
    pub fn compute_vertex_normals(&mut self) -> Result<&mut Self> {
        let Some(position) = self.attributes.get("position") else {
            return Ok(self);
        };
        if position.item_size() != 3 {
            return Err(Error::ItemSizeMismatch { expected: 3, actual: position.item_size() });
        }
        let positions = position.array().to_f64_vec();
        let mut normals = vec![0.0; positions.len()];

        if let Some(index) = &self.index {
            let indices = checked_indices(index, position.count(), 3)?;
            let whole = [Group { start: 0, count: indices.len(), material_index: 0 }];
            let groups: &[Group] = if self.groups.is_empty() { &whole } else { &self.groups };

            for group in groups {
                let end = group.start.saturating_add(group.count).min(indices.len());
                let start = group.start.min(end);
                for tri in indices[start..end].chunks_exact(3) {
                    let face = face_normal(&positions, tri[0], tri[1], tri[2]);
                    for &vertex in tri {
                        let mut n = Vector3::ZERO;
                        n.from_slice(&normals, vertex * 3).add(face).write_to_slice(&mut normals, vertex * 3);
                    }
                }
            }
        } else {
            for (first, out) in normals.chunks_exact_mut(9).enumerate() {
                let v = first * 3;
                let face = face_normal(&positions, v, v + 1, v + 2);
                for corner in 0..3 {
                    face.write_to_slice(out, corner * 3);
                }
            }
        }

        match self.attributes.get_mut("normal") {
            Some(normal) if normal.item_size() == 3 && normal.array().len() == normals.len() => {
                normal.array_mut().write_f64(0, &normals)?;
            }
            _ => {
                let normal = BufferAttribute::new(TypedArray::from_f64_slice(ArrayKind::Float32, &normals), 3, false)?;
                self.attributes.insert("normal".to_string(), normal);
            }
        }

        self.normalize_normals();
        if let Some(normal) = self.attributes.get_mut("normal") {
            normal.set_needs_update(true);
        }
        Ok(self)
    }

    /// Scales every normal to unit length. Zero normals stay zero.
    pub fn normalize_normals(&mut self) -> &mut Self {
        let Some(normals) = self.attributes.get_mut("normal") else {
            return self;
        };
        if normals.item_size() < 3 {
            debug!(item_size = normals.item_size(), "Normal attribute too short to normalize");
            return self;
        }
        for i in 0..normals.count() {
            let mut n = normals.get_vector3(i);
            n.normalize();
            normals.set_xyz(i, n.x, n.y, n.z);
        }
        self
    }

    // ------------------------------------------------------------------
    // Combination
    // ------------------------------------------------------------------

    /// Copies `other`'s attribute values into this geometry's matching
    /// attributes, starting at element `offset`.
    ///
    /// Only names present in both geometries are copied. Attributes are not
    /// resized; the caller sizes them up front.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if any copy would run past the end of the
    /// target attribute. This is checked for every attribute before the
    /// first write.
    pub fn merge(&mut self, other: &BufferGeometry, offset: usize) -> Result<&mut Self> {
        let mut copies = Vec::new();
        for (name, source) in &other.attributes {
            let Some(target) = self.attributes.get(name) else {
                continue;
            };
            let start = offset * target.item_size();
            let len = source.array().len();
            let capacity = target.array().len();
            if start.checked_add(len).is_none_or(|end| end > capacity) {
                return Err(Error::OutOfRange { offset: start, len, capacity });
            }
            copies.push((name, start));
        }

        for (name, start) in copies {
            let values = other.attributes[name].array().to_f64_vec();
            if let Some(target) = self.attributes.get_mut(name) {
                target.array_mut().write_f64(start, &values)?;
                target.set_needs_update(true);
            }
        }
        Ok(self)
    }

    /// Expands indexed geometry so every triangle corner has its own
    /// vertex.
    ///
    /// Groups and the name carry over. Non-indexed geometry is returned as
    /// a copy with a warning.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if an index points past an attribute's last
    /// element.
    pub fn to_non_indexed(&self) -> Result<BufferGeometry> {
        let Some(index) = &self.index else {
            warn!(geometry = self.id, "Geometry is already non-indexed, returning a copy");
            return Ok(self.clone());
        };

        let mut expanded = BufferGeometry::new();
        expanded.name = self.name.clone();
        expanded.groups = self.groups.clone();

        for (name, attribute) in &self.attributes {
            let n = attribute.item_size();
            let indices = checked_indices(index, attribute.count(), n)?;
            let source = attribute.array();

            let mut values = Vec::with_capacity(indices.len() * n);
            for i in indices {
                values.extend((0..n).map(|c| source.get(i * n + c)));
            }
            let array = TypedArray::from_f64_slice(attribute.kind(), &values);
            let attr = BufferAttribute::new(array, n, attribute.normalized)?;
            expanded.attributes.insert(name.clone(), attr);
        }
        Ok(expanded)
    }
}

/// Reads the index buffer, rejecting values at or past `count`.
fn checked_indices(index: &BufferAttribute, count: usize, item_size: usize) -> Result<Vec<usize>> {
    let indices: Vec<usize> = index.array().iter().map(|i| i as usize).collect();
    match indices.iter().find(|&&i| i >= count) {
        Some(&bad) => Err(Error::OutOfRange {
            offset: bad * item_size,
            len: item_size,
            capacity: count * item_size,
        }),
        None => Ok(indices),
    }
}

/// Unnormalized `(C - B) x (A - B)` for vertices `a`, `b`, `c`.
fn face_normal(positions: &[f64], a: usize, b: usize, c: usize) -> Vector3 {
    let (mut pa, mut pb, mut pc) = (Vector3::ZERO, Vector3::ZERO, Vector3::ZERO);
    pa.from_slice(positions, a * 3);
    pb.from_slice(positions, b * 3);
    pc.from_slice(positions, c * 3);

    let mut cb = Vector3::ZERO;
    let mut ab = Vector3::ZERO;
    cb.sub_vectors(pc, pb);
    ab.sub_vectors(pa, pb);
    *cb.cross(ab)
}

/// Largest squared distance from `center` to any packed `xyz` point.
#[cfg(feature = "rayon")]
fn max_distance_sq(points: &[f64], center: Vector3) -> f64 {
    use rayon::prelude::*;

    points
        .par_chunks_exact(3)
        .map(|p| center.distance_to_squared(Vector3::new(p[0], p[1], p[2])))
        .reduce(|| 0.0, f64::max)
}

#[cfg(not(feature = "rayon"))]
fn max_distance_sq(points: &[f64], center: Vector3) -> f64 {
    points
        .chunks_exact(3)
        .map(|p| center.distance_to_squared(Vector3::new(p[0], p[1], p[2])))
        .fold(0.0, f64::max)
}
