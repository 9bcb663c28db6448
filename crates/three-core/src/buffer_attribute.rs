//! One vertex attribute: a typed array read in fixed-size items.
//!
//! A position attribute with `item_size == 3` stores `x, y, z` for every
//! vertex back to back; [`BufferAttribute::count`] is the number of
//! vertices. Accessors take *element* indices and multiply by the item size
//! internally.
//!
//! # Dirty tracking
//!
//! Renderers re-upload an attribute when its [`BufferAttribute::version`]
//! changes. Writers bump it with `set_needs_update(true)` after a batch of
//! edits; the setters here never do it implicitly.
//!
//! # Usage
//!
//! ```rust
//! use three_core::BufferAttribute;
//!
//! let mut positions = BufferAttribute::new(vec![0.0f32; 9], 3, false).unwrap();
//! positions.set_xyz(1, 1.0, 2.0, 3.0);
//! positions.set_needs_update(true);
//!
//! assert_eq!(positions.count(), 3);
//! assert_eq!(positions.get_y(1), 2.0);
//! assert_eq!(positions.version(), 1);
//! ```

use three_math::{Color, Matrix3, Matrix4, Vector2, Vector3, Vector4, generate_uuid};
use tracing::warn;

use crate::{ArrayKind, Error, Result, TypedArray};

/// Part of an attribute to re-upload; `count == None` means everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateRange {
    /// First value (not element) to upload
    pub offset: usize,
    /// Number of values, or `None` for all
    pub count: Option<usize>,
}

/// Typed array plus the metadata a renderer needs to bind it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferAttribute {
    uuid: String,
    array: TypedArray,
    item_size: usize,
    count: usize,
    /// Integer data is mapped to `[0, 1]` (or `[-1, 1]`) when read by shaders.
    pub normalized: bool,
    dynamic: bool,
    update_range: UpdateRange,
    needs_update: bool,
    version: u32,
}

/// Checks that `item_size` is positive and divides `len`.
fn check_item_size(item_size: usize, len: usize) -> Result<usize> {
    if item_size == 0 || len % item_size != 0 {
        return Err(Error::InvalidItemSize { item_size, len });
    }
    Ok(len / item_size)
}

impl BufferAttribute {
    /// Wraps `array`, read `item_size` values at a time.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidItemSize`] if `item_size` is zero or does not divide
    /// the array length.
    pub fn new(array: impl Into<TypedArray>, item_size: usize, normalized: bool) -> Result<Self> {
        let array = array.into();
        let count = check_item_size(item_size, array.len())?;
        Ok(Self {
            uuid: generate_uuid(),
            array,
            item_size,
            count,
            normalized,
            dynamic: false,
            update_range: UpdateRange::default(),
            needs_update: true,
            version: 0,
        })
    }

    /// `count` zeroed elements of `kind`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidItemSize`] if `item_size` is zero.
    pub fn zeroed(kind: ArrayKind, count: usize, item_size: usize) -> Result<Self> {
        Self::new(TypedArray::zeroed(kind, count * item_size), item_size, false)
    }

    /// Unique identifier assigned at construction.
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Backing storage.
    pub fn array(&self) -> &TypedArray {
        &self.array
    }

    /// Element kind of the backing storage.
    pub fn kind(&self) -> ArrayKind {
        self.array.kind()
    }

    /// Values per element.
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// Number of elements (`array.len() / item_size`).
    pub fn count(&self) -> usize {
        self.count
    }

    /// Replaces the backing storage and recomputes [`Self::count`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidItemSize`] if the new length is not a multiple of the
    /// item size; the attribute is unchanged.
    pub fn set_array(&mut self, array: impl Into<TypedArray>) -> Result<&mut Self> {
        let array = array.into();
        self.count = check_item_size(self.item_size, array.len())?;
        self.array = array;
        Ok(self)
    }

    /// Whether the data is expected to change often.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Hints that the data changes often.
    pub fn set_dynamic(&mut self, dynamic: bool) -> &mut Self {
        self.dynamic = dynamic;
        self
    }

    /// Range to upload on the next update.
    pub fn update_range(&self) -> UpdateRange {
        self.update_range
    }

    /// Restricts the next upload to `count` values from `offset`.
    pub fn set_update_range(&mut self, offset: usize, count: Option<usize>) -> &mut Self {
        self.update_range = UpdateRange { offset, count };
        self
    }

    /// Whether the data was marked dirty.
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Marks the data dirty (or clean). Marking dirty bumps the version.
    pub fn set_needs_update(&mut self, needs_update: bool) -> &mut Self {
        if needs_update {
            self.version = self.version.wrapping_add(1);
        }
        self.needs_update = needs_update;
        self
    }

    /// Counter bumped every time the data is marked dirty.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Copies element `src_index` of `other` into element `index`.
    ///
    /// # Errors
    ///
    /// - [`Error::ItemSizeMismatch`] if the item sizes differ
    /// - [`Error::OutOfRange`] if either index is past the element count
    pub fn copy_at(&mut self, index: usize, other: &BufferAttribute, src_index: usize) -> Result<&mut Self> {
        if other.item_size != self.item_size {
            return Err(Error::ItemSizeMismatch { expected: self.item_size, actual: other.item_size });
        }
        let n = self.item_size;
        if src_index >= other.count {
            return Err(Error::OutOfRange { offset: src_index * n, len: n, capacity: other.array.len() });
        }
        let values: Vec<f64> = (0..n).map(|c| other.array.get(src_index * n + c)).collect();
        self.array.write_f64(index * n, &values)?;
        Ok(self)
    }

    /// Writes `values` from the start of the array.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if there are more values than the array holds;
    /// nothing is written.
    pub fn copy_array(&mut self, values: &[f64]) -> Result<&mut Self> {
        self.array.write_f64(0, values)?;
        Ok(self)
    }

    /// Writes `values` starting at value `offset`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if the values don't fit; nothing is written.
    pub fn set(&mut self, values: &[f64], offset: usize) -> Result<&mut Self> {
        self.array.write_f64(offset, values)?;
        Ok(self)
    }

    /// Writes `r, g, b` triples from the start of the array.
    ///
    /// A `None` entry is written as the default color (white) and logged.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if the colors don't fit; nothing is written.
    pub fn copy_colors_array(&mut self, colors: &[Option<Color>]) -> Result<&mut Self> {
        let values = flatten_or_default(colors, "color", |c: Color| [c.r, c.g, c.b]);
        self.copy_array(&values)
    }

    /// Writes `x, y` pairs from the start of the array.
    ///
    /// A `None` entry is written as the zero vector and logged.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if the vectors don't fit; nothing is written.
    pub fn copy_vector2s_array(&mut self, vectors: &[Option<Vector2>]) -> Result<&mut Self> {
        let values = flatten_or_default(vectors, "vector2", |v: Vector2| v.to_array());
        self.copy_array(&values)
    }

    /// Writes `x, y, z` triples from the start of the array.
    ///
    /// A `None` entry is written as the zero vector and logged.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if the vectors don't fit; nothing is written.
    pub fn copy_vector3s_array(&mut self, vectors: &[Option<Vector3>]) -> Result<&mut Self> {
        let values = flatten_or_default(vectors, "vector3", |v: Vector3| v.to_array());
        self.copy_array(&values)
    }

    /// Writes `x, y, z, w` quadruples from the start of the array.
    ///
    /// A `None` entry is written as `(0, 0, 0, 1)` and logged.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if the vectors don't fit; nothing is written.
    pub fn copy_vector4s_array(&mut self, vectors: &[Option<Vector4>]) -> Result<&mut Self> {
        let values = flatten_or_default(vectors, "vector4", |v: Vector4| v.to_array());
        self.copy_array(&values)
    }

    /// Writes triangle corner indices from the start of the array.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if the triangles don't fit; nothing is written.
    pub fn copy_indices_array(&mut self, triangles: &[[u32; 3]]) -> Result<&mut Self> {
        let values: Vec<f64> = triangles.iter().flatten().map(|&i| i as f64).collect();
        self.copy_array(&values)
    }

    /// Component `c` of element `index`.
    #[inline]
    fn component(&self, index: usize, c: usize) -> f64 {
        self.array.get(index * self.item_size + c)
    }

    #[inline]
    fn set_component(&mut self, index: usize, c: usize, value: f64) {
        self.array.set(index * self.item_size + c, value);
    }

    /// First component of element `index`.
    ///
    /// # Panics
    ///
    /// Panics if the component lies past the end of the array. The same
    /// holds for every `get_*`/`set_*` accessor.
    pub fn get_x(&self, index: usize) -> f64 {
        self.component(index, 0)
    }

    /// Second component of element `index`.
    pub fn get_y(&self, index: usize) -> f64 {
        self.component(index, 1)
    }

    /// Third component of element `index`.
    pub fn get_z(&self, index: usize) -> f64 {
        self.component(index, 2)
    }

    /// Fourth component of element `index`.
    pub fn get_w(&self, index: usize) -> f64 {
        self.component(index, 3)
    }

    /// Sets the first component of element `index`.
    pub fn set_x(&mut self, index: usize, x: f64) -> &mut Self {
        self.set_component(index, 0, x);
        self
    }

    /// Sets the second component of element `index`.
    pub fn set_y(&mut self, index: usize, y: f64) -> &mut Self {
        self.set_component(index, 1, y);
        self
    }

    /// Sets the third component of element `index`.
    pub fn set_z(&mut self, index: usize, z: f64) -> &mut Self {
        self.set_component(index, 2, z);
        self
    }

    /// Sets the fourth component of element `index`.
    pub fn set_w(&mut self, index: usize, w: f64) -> &mut Self {
        self.set_component(index, 3, w);
        self
    }

    /// Sets the first two components of element `index`.
    pub fn set_xy(&mut self, index: usize, x: f64, y: f64) -> &mut Self {
        self.set_x(index, x).set_y(index, y)
    }

    /// Sets the first three components of element `index`.
    pub fn set_xyz(&mut self, index: usize, x: f64, y: f64, z: f64) -> &mut Self {
        self.set_xy(index, x, y).set_z(index, z)
    }

    /// Sets the first four components of element `index`.
    pub fn set_xyzw(&mut self, index: usize, x: f64, y: f64, z: f64, w: f64) -> &mut Self {
        self.set_xyz(index, x, y, z).set_w(index, w)
    }

    /// Element `index` as a vector of its first three components.
    pub fn get_vector3(&self, index: usize) -> Vector3 {
        Vector3::new(self.get_x(index), self.get_y(index), self.get_z(index))
    }

    fn require_item_size(&self, min: usize) -> Result<()> {
        if self.item_size < min {
            return Err(Error::ItemSizeMismatch { expected: min, actual: self.item_size });
        }
        Ok(())
    }

    /// Multiplies every element by `m`.
    ///
    /// Two-component items are treated as 2D points in homogeneous form.
    /// Larger items transform their first three components.
    ///
    /// # Errors
    ///
    /// [`Error::ItemSizeMismatch`] for single-component attributes.
    pub fn apply_matrix3(&mut self, m: &Matrix3) -> Result<&mut Self> {
        self.require_item_size(2)?;
        for i in 0..self.count {
            if self.item_size == 2 {
                let mut v = Vector2::new(self.get_x(i), self.get_y(i));
                v.apply_matrix3(m);
                self.set_xy(i, v.x, v.y);
            } else {
                let mut v = self.get_vector3(i);
                v.apply_matrix3(m);
                self.set_xyz(i, v.x, v.y, v.z);
            }
        }
        Ok(self)
    }

    /// Transforms every element as a point by `m`.
    ///
    /// # Errors
    ///
    /// [`Error::ItemSizeMismatch`] if items have fewer than three components.
    pub fn apply_matrix4(&mut self, m: &Matrix4) -> Result<&mut Self> {
        self.require_item_size(3)?;
        for i in 0..self.count {
            let mut v = self.get_vector3(i);
            v.apply_matrix4(m);
            self.set_xyz(i, v.x, v.y, v.z);
        }
        Ok(self)
    }

    /// Transforms every element as a normal by `m` and renormalizes it.
    ///
    /// # Errors
    ///
    /// [`Error::ItemSizeMismatch`] if items have fewer than three components.
    pub fn apply_normal_matrix(&mut self, m: &Matrix3) -> Result<&mut Self> {
        self.require_item_size(3)?;
        for i in 0..self.count {
            let mut v = self.get_vector3(i);
            v.apply_matrix3(m).normalize();
            self.set_xyz(i, v.x, v.y, v.z);
        }
        Ok(self)
    }

    /// First three components of every element, flattened.
    ///
    /// Items with fewer than three components are padded with zeros.
    pub fn xyz_values(&self) -> Vec<f64> {
        let n = self.item_size.min(3);
        let mut values = Vec::with_capacity(self.count * 3);
        for i in 0..self.count {
            for c in 0..3 {
                values.push(if c < n { self.component(i, c) } else { 0.0 });
            }
        }
        values
    }

    /// Mutable storage for crate-internal bulk rewrites that keep the length.
    pub(crate) fn array_mut(&mut self) -> &mut TypedArray {
        &mut self.array
    }
}

/// Flattens `items`, substituting `T::default()` for missing entries.
fn flatten_or_default<T, const N: usize>(
    items: &[Option<T>],
    what: &str,
    to_values: impl Fn(T) -> [f64; N],
) -> Vec<f64>
where
    T: Copy + Default,
{
    let mut values = Vec::with_capacity(items.len() * N);
    for (index, item) in items.iter().enumerate() {
        let item = item.unwrap_or_else(|| {
            warn!(index, kind = what, "Missing entry in bulk copy, using default");
            T::default()
        });
        values.extend(to_values(item));
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(count: usize) -> BufferAttribute {
        BufferAttribute::zeroed(ArrayKind::Float64, count, 3).unwrap()
    }

    #[test]
    fn test_count_follows_array() {
        let mut attr = BufferAttribute::new(vec![0.0f32; 12], 3, false).unwrap();
        assert_eq!(attr.count(), 4);
        assert_eq!(attr.kind(), ArrayKind::Float32);

        attr.set_array(vec![0u16; 6]).unwrap();
        assert_eq!(attr.count(), 2);
        assert_eq!(attr.array().len(), attr.count() * attr.item_size());
    }

    #[test]
    fn test_invalid_item_size() {
        assert_eq!(
            BufferAttribute::new(vec![0.0f32; 4], 3, false).err(),
            Some(Error::InvalidItemSize { item_size: 3, len: 4 })
        );
        assert!(BufferAttribute::new(vec![0.0f32; 4], 0, false).is_err());

        let mut attr = positions(2);
        assert!(attr.set_array(vec![0.0f64; 5]).is_err());
        assert_eq!(attr.count(), 2);
        assert_eq!(attr.array().len(), 6);
    }

    #[test]
    fn test_set_xyz_get_exact() {
        let mut attr = positions(3);
        attr.set_xyz(2, 0.1, -7.25, 1e10);
        assert_eq!((attr.get_x(2), attr.get_y(2), attr.get_z(2)), (0.1, -7.25, 1e10));
        assert_eq!(attr.get_x(1), 0.0);

        let mut rgba = BufferAttribute::zeroed(ArrayKind::Float32, 2, 4).unwrap();
        rgba.set_xyzw(1, 0.5, 0.25, 0.125, 1.0);
        assert_eq!(rgba.array().to_f64_vec(), vec![0.0, 0.0, 0.0, 0.0, 0.5, 0.25, 0.125, 1.0]);
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_bounds_panics() {
        positions(2).get_x(2);
    }

    #[test]
    fn test_version_bumps_on_dirty() {
        let mut attr = positions(1);
        assert!(attr.needs_update());
        assert_eq!(attr.version(), 0);

        attr.set_needs_update(false);
        assert_eq!(attr.version(), 0);
        attr.set_needs_update(true).set_needs_update(true);
        assert_eq!(attr.version(), 2);
    }

    #[test]
    fn test_flags() {
        let mut attr = positions(4);
        assert_eq!(attr.update_range(), UpdateRange { offset: 0, count: None });

        attr.set_dynamic(true).set_update_range(3, Some(6));
        assert!(attr.is_dynamic());
        assert_eq!(attr.update_range(), UpdateRange { offset: 3, count: Some(6) });
    }

    #[test]
    fn test_uuid_per_attribute() {
        let a = positions(1);
        let b = positions(1);
        assert_eq!(a.uuid().len(), 36);
        assert_ne!(a.uuid(), b.uuid());
    }

    #[test]
    fn test_copy_at_uses_element_indices() {
        let mut src = positions(3);
        src.set_xyz(2, 4.0, 5.0, 6.0);

        let mut dst = positions(2);
        dst.copy_at(1, &src, 2).unwrap();
        assert_eq!(dst.array().to_f64_vec(), vec![0.0, 0.0, 0.0, 4.0, 5.0, 6.0]);

        assert!(matches!(dst.copy_at(2, &src, 0), Err(Error::OutOfRange { .. })));
        assert!(matches!(dst.copy_at(0, &src, 3), Err(Error::OutOfRange { .. })));

        let uv = BufferAttribute::zeroed(ArrayKind::Float32, 3, 2).unwrap();
        assert_eq!(
            dst.copy_at(0, &uv, 0).err(),
            Some(Error::ItemSizeMismatch { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn test_bulk_copies() {
        let mut attr = positions(2);
        attr.copy_vector3s_array(&[Some(Vector3::new(1.0, 2.0, 3.0)), Some(Vector3::ONE)])
            .unwrap();
        assert_eq!(attr.array().to_f64_vec(), vec![1.0, 2.0, 3.0, 1.0, 1.0, 1.0]);

        attr.copy_colors_array(&[Some(Color::new(0.0, 0.5, 1.0))]).unwrap();
        assert_eq!(attr.array().to_f64_vec(), vec![0.0, 0.5, 1.0, 1.0, 1.0, 1.0]);

        let mut uv = BufferAttribute::zeroed(ArrayKind::Float32, 2, 2).unwrap();
        uv.copy_vector2s_array(&[Some(Vector2::new(0.25, 0.75)), Some(Vector2::ONE)]).unwrap();
        assert_eq!(uv.array().to_f64_vec(), vec![0.25, 0.75, 1.0, 1.0]);

        let mut index = BufferAttribute::zeroed(ArrayKind::Uint16, 6, 1).unwrap();
        index.copy_indices_array(&[[0, 1, 2], [2, 3, 0]]).unwrap();
        assert_eq!(index.array().as_slice::<u16>(), Some(&[0u16, 1, 2, 2, 3, 0][..]));
    }

    #[test]
    fn test_missing_entries_use_defaults() {
        let mut attr = positions(2);
        attr.set_xyz(0, 9.0, 9.0, 9.0);
        attr.copy_vector3s_array(&[None, Some(Vector3::ONE)]).unwrap();
        assert_eq!(attr.array().to_f64_vec(), vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);

        attr.copy_colors_array(&[None]).unwrap();
        assert_eq!(attr.get_vector3(0), Vector3::ONE);

        let mut tangents = BufferAttribute::zeroed(ArrayKind::Float32, 1, 4).unwrap();
        tangents.copy_vector4s_array(&[None]).unwrap();
        assert_eq!(tangents.array().to_f64_vec(), vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_bulk_overflow_writes_nothing() {
        let mut attr = positions(1);
        let too_many = [Some(Vector3::ONE), Some(Vector3::ONE)];
        assert_eq!(
            attr.copy_vector3s_array(&too_many).err(),
            Some(Error::OutOfRange { offset: 0, len: 6, capacity: 3 })
        );
        assert_eq!(attr.array().to_f64_vec(), vec![0.0; 3]);

        assert!(attr.set(&[1.0, 2.0], 2).is_err());
        attr.set(&[1.0, 2.0], 1).unwrap();
        assert_eq!(attr.array().to_f64_vec(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_xyz_values_pads_short_items() {
        let mut uv = BufferAttribute::zeroed(ArrayKind::Float64, 2, 2).unwrap();
        uv.set_xy(0, 1.0, 2.0).set_xy(1, 3.0, 4.0);
        assert_eq!(uv.xyz_values(), vec![1.0, 2.0, 0.0, 3.0, 4.0, 0.0]);

        let mut tangents = BufferAttribute::zeroed(ArrayKind::Float64, 1, 4).unwrap();
        tangents.set_xyzw(0, 1.0, 2.0, 3.0, 4.0);
        assert_eq!(tangents.xyz_values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_apply_matrix4() {
        let mut attr = positions(2);
        attr.set_xyz(0, 1.0, 0.0, 0.0).set_xyz(1, 0.0, 2.0, 0.0);

        let mut m = Matrix4::IDENTITY;
        m.make_translation(1.0, 1.0, 1.0);
        attr.apply_matrix4(&m).unwrap();
        assert_eq!(attr.array().to_f64_vec(), vec![2.0, 1.0, 1.0, 1.0, 3.0, 1.0]);

        let mut uv = BufferAttribute::zeroed(ArrayKind::Float32, 1, 2).unwrap();
        assert!(matches!(uv.apply_matrix4(&m), Err(Error::ItemSizeMismatch { .. })));
    }

    #[test]
    fn test_apply_matrix3_on_uvs() {
        let mut uv = BufferAttribute::zeroed(ArrayKind::Float64, 1, 2).unwrap();
        uv.set_xy(0, 0.5, 0.5);

        // 2D translation by (1, 2) in homogeneous form
        let mut m = Matrix3::IDENTITY;
        m.set(1.0, 0.0, 1.0, 0.0, 1.0, 2.0, 0.0, 0.0, 1.0);
        uv.apply_matrix3(&m).unwrap();
        assert_eq!(uv.array().to_f64_vec(), vec![1.5, 2.5]);
    }

    #[test]
    fn test_apply_normal_matrix() {
        let mut normals = positions(1);
        normals.set_xyz(0, 1.0, 1.0, 0.0);

        let mut m4 = Matrix4::IDENTITY;
        m4.make_scale(1.0, 2.0, 1.0);
        let mut n = Matrix3::IDENTITY;
        n.get_normal_matrix(&m4);

        normals.apply_normal_matrix(&n).unwrap();
        let v = normals.get_vector3(0);
        assert!((v.length() - 1.0).abs() < 1e-12);
        assert!((v.x - 2.0 / 5.0f64.sqrt()).abs() < 1e-12);
        assert!((v.y - 1.0 / 5.0f64.sqrt()).abs() < 1e-12);
    }
}
