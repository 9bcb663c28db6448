//! 3D vector for positions, directions and scale factors.
//!
//! [`Vector3`] is a plain `Copy` value. Mutating methods take `&mut self`
//! and return `&mut Self`, so calls can be chained:
//!
//! ```rust
//! use three_math::Vector3;
//!
//! let mut v = Vector3::new(1.0, 2.0, 3.0);
//! v.add(Vector3::ONE).multiply_scalar(2.0);
//! assert_eq!(v, Vector3::new(4.0, 6.0, 8.0));
//! ```
//!
//! The `*_vectors` constructors (`add_vectors`, `cross_vectors`, ...) write
//! their result into the receiver and never touch their arguments.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::{clamp, Error, Euler, Matrix3, Matrix4, Projector, Quaternion, Result};

/// A 3-component `f64` vector.
///
/// # Example
///
/// ```rust
/// use three_math::{Matrix4, Vector3};
///
/// let mut m = Matrix4::IDENTITY;
/// m.make_translation(0.0, 2.0, 0.0);
///
/// let mut p = Vector3::new(1.0, 0.0, 0.0);
/// p.apply_matrix4(&m);
/// assert_eq!(p, Vector3::new(1.0, 2.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Vector3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vector3 {
    /// Zero vector (0, 0, 0).
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// One vector (1, 1, 1).
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Unit X vector (1, 0, 0).
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Y vector (0, 1, 0).
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit Z vector (0, 0, 1).
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// All components set to `f64::MAX`.
    pub const MAX: Self = Self::splat(f64::MAX);

    /// All components set to `-f64::MAX`.
    pub const MIN: Self = Self::splat(-f64::MAX);

    /// Creates a new vector.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a vector with all components set to `v`.
    #[inline]
    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    /// Creates from an array.
    #[inline]
    pub const fn from_array(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    /// Converts to an array.
    #[inline]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Converts to a single-precision array.
    #[inline]
    pub fn to_array32(self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }

    /// Reads three consecutive values starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `array` holds fewer than `offset + 3` values.
    pub fn from_slice(&mut self, array: &[f64], offset: usize) -> &mut Self {
        self.x = array[offset];
        self.y = array[offset + 1];
        self.z = array[offset + 2];
        self
    }

    /// Writes the components into `target` starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `target` holds fewer than `offset + 3` values.
    pub fn write_to_slice(self, target: &mut [f64], offset: usize) {
        target[offset..offset + 3].copy_from_slice(&self.to_array());
    }

    /// Sets all components.
    #[inline]
    pub fn set(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    /// Sets all components to `scalar`.
    #[inline]
    pub fn set_scalar(&mut self, scalar: f64) -> &mut Self {
        self.set(scalar, scalar, scalar)
    }

    /// Sets the x component.
    #[inline]
    pub fn set_x(&mut self, x: f64) -> &mut Self {
        self.x = x;
        self
    }

    /// Sets the y component.
    #[inline]
    pub fn set_y(&mut self, y: f64) -> &mut Self {
        self.y = y;
        self
    }

    /// Sets the z component.
    #[inline]
    pub fn set_z(&mut self, z: f64) -> &mut Self {
        self.z = z;
        self
    }

    /// Sets a component by index (0 = x, 1 = y, 2 = z).
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] for `index >= 3`.
    pub fn set_component(&mut self, index: usize, value: f64) -> Result<&mut Self> {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            2 => self.z = value,
            _ => return Err(Error::IndexOutOfRange { index, len: 3 }),
        }
        Ok(self)
    }

    /// Gets a component by index (0 = x, 1 = y, 2 = z).
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] for `index >= 3`.
    pub fn get_component(&self, index: usize) -> Result<f64> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            2 => Ok(self.z),
            _ => Err(Error::IndexOutOfRange { index, len: 3 }),
        }
    }

    /// Adds `v` component-wise.
    #[inline]
    pub fn add(&mut self, v: Vector3) -> &mut Self {
        self.x += v.x;
        self.y += v.y;
        self.z += v.z;
        self
    }

    /// Adds `s` to every component.
    #[inline]
    pub fn add_scalar(&mut self, s: f64) -> &mut Self {
        self.x += s;
        self.y += s;
        self.z += s;
        self
    }

    /// Sets this vector to `a + b`.
    #[inline]
    pub fn add_vectors(&mut self, a: Vector3, b: Vector3) -> &mut Self {
        self.set(a.x + b.x, a.y + b.y, a.z + b.z)
    }

    /// Adds `v * s`.
    #[inline]
    pub fn add_scaled_vector(&mut self, v: Vector3, s: f64) -> &mut Self {
        self.x += v.x * s;
        self.y += v.y * s;
        self.z += v.z * s;
        self
    }

    /// Subtracts `v` component-wise.
    #[inline]
    pub fn sub(&mut self, v: Vector3) -> &mut Self {
        self.x -= v.x;
        self.y -= v.y;
        self.z -= v.z;
        self
    }

    /// Subtracts `s` from every component.
    #[inline]
    pub fn sub_scalar(&mut self, s: f64) -> &mut Self {
        self.x -= s;
        self.y -= s;
        self.z -= s;
        self
    }

    /// Sets this vector to `a - b`.
    #[inline]
    pub fn sub_vectors(&mut self, a: Vector3, b: Vector3) -> &mut Self {
        self.set(a.x - b.x, a.y - b.y, a.z - b.z)
    }

    /// Multiplies component-wise by `v`.
    #[inline]
    pub fn multiply(&mut self, v: Vector3) -> &mut Self {
        self.x *= v.x;
        self.y *= v.y;
        self.z *= v.z;
        self
    }

    /// Multiplies every component by `scalar`.
    ///
    /// An infinite `scalar` zeroes the vector instead of producing
    /// infinities. This is what makes [`normalize`](Self::normalize) of a
    /// zero-length vector return the zero vector. `NaN` still propagates.
    pub fn multiply_scalar(&mut self, scalar: f64) -> &mut Self {
        if scalar.is_infinite() {
            self.set_scalar(0.0)
        } else {
            self.x *= scalar;
            self.y *= scalar;
            self.z *= scalar;
            self
        }
    }

    /// Sets this vector to `a * b` component-wise.
    #[inline]
    pub fn multiply_vectors(&mut self, a: Vector3, b: Vector3) -> &mut Self {
        self.set(a.x * b.x, a.y * b.y, a.z * b.z)
    }

    /// Divides component-wise by `v`.
    #[inline]
    pub fn divide(&mut self, v: Vector3) -> &mut Self {
        self.x /= v.x;
        self.y /= v.y;
        self.z /= v.z;
        self
    }

    /// Divides every component by `scalar` via `multiply_scalar(1 / scalar)`.
    #[inline]
    pub fn divide_scalar(&mut self, scalar: f64) -> &mut Self {
        self.multiply_scalar(1.0 / scalar)
    }

    /// Rotates by the given Euler angles.
    pub fn apply_euler(&mut self, euler: &Euler) -> &mut Self {
        let mut q = Quaternion::IDENTITY;
        q.set_from_euler(euler);
        self.apply_quaternion(q)
    }

    /// Rotates around a normalized `axis` by `angle` radians.
    pub fn apply_axis_angle(&mut self, axis: Vector3, angle: f64) -> &mut Self {
        let mut q = Quaternion::IDENTITY;
        q.set_from_axis_angle(axis, angle);
        self.apply_quaternion(q)
    }

    /// Multiplies by a 3x3 matrix.
    pub fn apply_matrix3(&mut self, m: &Matrix3) -> &mut Self {
        let (x, y, z) = (self.x, self.y, self.z);
        let e = &m.elements;

        self.x = e[0] * x + e[3] * y + e[6] * z;
        self.y = e[1] * x + e[4] * y + e[7] * z;
        self.z = e[2] * x + e[5] * y + e[8] * z;
        self
    }

    /// Transforms as a point by an affine matrix (translation applies).
    pub fn apply_matrix4(&mut self, m: &Matrix4) -> &mut Self {
        let (x, y, z) = (self.x, self.y, self.z);
        let e = &m.elements;

        self.x = e[0] * x + e[4] * y + e[8] * z + e[12];
        self.y = e[1] * x + e[5] * y + e[9] * z + e[13];
        self.z = e[2] * x + e[6] * y + e[10] * z + e[14];
        self
    }

    /// Transforms by a projection matrix, including the perspective divide.
    pub fn apply_projection(&mut self, m: &Matrix4) -> &mut Self {
        let (x, y, z) = (self.x, self.y, self.z);
        let e = &m.elements;
        let d = 1.0 / (e[3] * x + e[7] * y + e[11] * z + e[15]);

        self.x = (e[0] * x + e[4] * y + e[8] * z + e[12]) * d;
        self.y = (e[1] * x + e[5] * y + e[9] * z + e[13]) * d;
        self.z = (e[2] * x + e[6] * y + e[10] * z + e[14]) * d;
        self
    }

    /// Rotates by a quaternion (`q * v * q^-1`, expanded).
    pub fn apply_quaternion(&mut self, q: Quaternion) -> &mut Self {
        let (x, y, z) = (self.x, self.y, self.z);
        let (qx, qy, qz, qw) = (q.x, q.y, q.z, q.w);

        // q * v
        let ix = qw * x + qy * z - qz * y;
        let iy = qw * y + qz * x - qx * z;
        let iz = qw * z + qx * y - qy * x;
        let iw = -qx * x - qy * y - qz * z;

        // (q * v) * q^-1
        self.x = ix * qw + iw * -qx + iy * -qz - iz * -qy;
        self.y = iy * qw + iw * -qy + iz * -qx - ix * -qz;
        self.z = iz * qw + iw * -qz + ix * -qy - iy * -qx;
        self
    }

    /// Projects a world-space point into normalized device coordinates.
    pub fn project(&mut self, camera: &dyn Projector) -> &mut Self {
        let mut view = Matrix4::IDENTITY;
        view.get_inverse(&camera.matrix_world());
        let mut m = Matrix4::IDENTITY;
        m.multiply_matrices(&camera.projection_matrix(), &view);
        self.apply_projection(&m)
    }

    /// Maps normalized device coordinates back into world space.
    pub fn unproject(&mut self, camera: &dyn Projector) -> &mut Self {
        let mut inv_projection = Matrix4::IDENTITY;
        inv_projection.get_inverse(&camera.projection_matrix());
        let mut m = Matrix4::IDENTITY;
        m.multiply_matrices(&camera.matrix_world(), &inv_projection);
        self.apply_projection(&m)
    }

    /// Transforms as a direction (translation ignored), then normalizes.
    pub fn transform_direction(&mut self, m: &Matrix4) -> &mut Self {
        let (x, y, z) = (self.x, self.y, self.z);
        let e = &m.elements;

        self.x = e[0] * x + e[4] * y + e[8] * z;
        self.y = e[1] * x + e[5] * y + e[9] * z;
        self.z = e[2] * x + e[6] * y + e[10] * z;
        self.normalize()
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(&mut self, v: Vector3) -> &mut Self {
        self.x = self.x.min(v.x);
        self.y = self.y.min(v.y);
        self.z = self.z.min(v.z);
        self
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(&mut self, v: Vector3) -> &mut Self {
        self.x = self.x.max(v.x);
        self.y = self.y.max(v.y);
        self.z = self.z.max(v.z);
        self
    }

    /// Clamps each component between `min` and `max`.
    pub fn clamp(&mut self, min: Vector3, max: Vector3) -> &mut Self {
        self.x = clamp(self.x, min.x, max.x);
        self.y = clamp(self.y, min.y, max.y);
        self.z = clamp(self.z, min.z, max.z);
        self
    }

    /// Clamps each component between two scalars.
    pub fn clamp_scalar(&mut self, min: f64, max: f64) -> &mut Self {
        self.clamp(Vector3::splat(min), Vector3::splat(max))
    }

    /// Rescales so the length lies in `[min, max]`.
    pub fn clamp_length(&mut self, min: f64, max: f64) -> &mut Self {
        let length = self.length();
        self.multiply_scalar(min.max(max.min(length)) / length)
    }

    /// Floors each component.
    #[inline]
    pub fn floor(&mut self) -> &mut Self {
        self.set(self.x.floor(), self.y.floor(), self.z.floor())
    }

    /// Ceils each component.
    #[inline]
    pub fn ceil(&mut self) -> &mut Self {
        self.set(self.x.ceil(), self.y.ceil(), self.z.ceil())
    }

    /// Rounds each component half up.
    #[inline]
    pub fn round(&mut self) -> &mut Self {
        self.set(crate::round(self.x), crate::round(self.y), crate::round(self.z))
    }

    /// Rounds each component toward zero.
    #[inline]
    pub fn round_to_zero(&mut self) -> &mut Self {
        self.set(self.x.trunc(), self.y.trunc(), self.z.trunc())
    }

    /// Negates each component.
    #[inline]
    pub fn negate(&mut self) -> &mut Self {
        self.set(-self.x, -self.y, -self.z)
    }

    /// Dot product.
    #[inline]
    pub fn dot(&self, v: Vector3) -> f64 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Squared length (avoids sqrt).
    #[inline]
    pub fn length_sq(&self) -> f64 {
        self.dot(*self)
    }

    /// Euclidean length.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length_sq().sqrt()
    }

    /// Sum of absolute components.
    #[inline]
    pub fn length_manhattan(&self) -> f64 {
        self.x.abs() + self.y.abs() + self.z.abs()
    }

    /// Scales to unit length. A zero vector stays zero.
    #[inline]
    pub fn normalize(&mut self) -> &mut Self {
        let length = self.length();
        self.divide_scalar(length)
    }

    /// Scales to the given length, keeping direction.
    pub fn set_length(&mut self, length: f64) -> &mut Self {
        self.normalize().multiply_scalar(length)
    }

    /// Linear interpolation toward `v`.
    pub fn lerp(&mut self, v: Vector3, alpha: f64) -> &mut Self {
        self.x += (v.x - self.x) * alpha;
        self.y += (v.y - self.y) * alpha;
        self.z += (v.z - self.z) * alpha;
        self
    }

    /// Sets this vector to the interpolation between `v1` and `v2`.
    pub fn lerp_vectors(&mut self, v1: Vector3, v2: Vector3, alpha: f64) -> &mut Self {
        self.sub_vectors(v2, v1).multiply_scalar(alpha).add(v1)
    }

    /// Cross product with `v`, stored in `self`.
    pub fn cross(&mut self, v: Vector3) -> &mut Self {
        let a = *self;
        self.cross_vectors(a, v)
    }

    /// Sets this vector to `a x b`.
    pub fn cross_vectors(&mut self, a: Vector3, b: Vector3) -> &mut Self {
        let (ax, ay, az) = (a.x, a.y, a.z);
        let (bx, by, bz) = (b.x, b.y, b.z);

        self.set(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }

    /// Projects onto the line spanned by `v`.
    pub fn project_on_vector(&mut self, v: Vector3) -> &mut Self {
        let scalar = v.dot(*self) / v.length_sq();
        *self = v;
        self.multiply_scalar(scalar)
    }

    /// Removes the component along `plane_normal`.
    pub fn project_on_plane(&mut self, plane_normal: Vector3) -> &mut Self {
        let mut along = *self;
        along.project_on_vector(plane_normal);
        self.sub(along)
    }

    /// Reflects off the plane orthogonal to the unit-length `normal`.
    pub fn reflect(&mut self, normal: Vector3) -> &mut Self {
        let mut offset = normal;
        offset.multiply_scalar(2.0 * self.dot(normal));
        self.sub(offset)
    }

    /// Angle to `v` in radians, in `[0, pi]`.
    pub fn angle_to(&self, v: Vector3) -> f64 {
        let theta = self.dot(v) / (self.length_sq() * v.length_sq()).sqrt();

        // float overshoot past +-1 would make acos return NaN
        clamp(theta, -1.0, 1.0).acos()
    }

    /// Euclidean distance to `v`.
    #[inline]
    pub fn distance_to(&self, v: Vector3) -> f64 {
        self.distance_to_squared(v).sqrt()
    }

    /// Squared distance to `v`.
    #[inline]
    pub fn distance_to_squared(&self, v: Vector3) -> f64 {
        let dx = self.x - v.x;
        let dy = self.y - v.y;
        let dz = self.z - v.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Manhattan distance to `v`.
    #[inline]
    pub fn distance_to_manhattan(&self, v: Vector3) -> f64 {
        (self.x - v.x).abs() + (self.y - v.y).abs() + (self.z - v.z).abs()
    }

    /// Copies the translation column of `m`.
    pub fn set_from_matrix_position(&mut self, m: &Matrix4) -> &mut Self {
        self.set_from_matrix_column(m, 3)
    }

    /// Sets to the lengths of the three basis columns of `m`.
    pub fn set_from_matrix_scale(&mut self, m: &Matrix4) -> &mut Self {
        let sx = self.set_from_matrix_column(m, 0).length();
        let sy = self.set_from_matrix_column(m, 1).length();
        let sz = self.set_from_matrix_column(m, 2).length();
        self.set(sx, sy, sz)
    }

    /// Copies the first three rows of column `index` of `m`.
    ///
    /// # Panics
    ///
    /// Panics if `index > 3`.
    pub fn set_from_matrix_column(&mut self, m: &Matrix4, index: usize) -> &mut Self {
        self.from_slice(&m.elements, index * 4)
    }
}

impl Index<usize> for Vector3 {
    type Output = f64;

    #[inline]
    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3 index out of bounds: {}", index),
        }
    }
}

impl IndexMut<usize> for Vector3 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vector3 index out of bounds: {}", index),
        }
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(a: [f64; 3]) -> Self {
        Self::from_array(a)
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(v: Vector3) -> Self {
        v.to_array()
    }
}

impl From<glam::DVec3> for Vector3 {
    fn from(v: glam::DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for glam::DVec3 {
    fn from(v: Vector3) -> Self {
        glam::DVec3::new(v.x, v.y, v.z)
    }
}
