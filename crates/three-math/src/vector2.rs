//! 2D vector, used mostly for texture coordinates.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::{clamp, Error, Matrix3, Result};

/// A 2-component `f64` vector.
///
/// Same conventions as [`Vector3`](crate::Vector3): mutators return
/// `&mut Self` for chaining and `*_vectors` variants leave their inputs alone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Vector2 {
    /// X component (U for texture coordinates)
    pub x: f64,
    /// Y component (V for texture coordinates)
    pub y: f64,
}

impl Vector2 {
    /// Zero vector (0, 0).
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// One vector (1, 1).
    pub const ONE: Self = Self::new(1.0, 1.0);

    /// Unit X vector (1, 0).
    pub const X: Self = Self::new(1.0, 0.0);

    /// Unit Y vector (0, 1).
    pub const Y: Self = Self::new(0.0, 1.0);

    /// Creates a new vector.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Creates a vector with both components set to `v`.
    #[inline]
    pub const fn splat(v: f64) -> Self {
        Self::new(v, v)
    }

    /// Creates from an array.
    #[inline]
    pub const fn from_array(a: [f64; 2]) -> Self {
        Self::new(a[0], a[1])
    }

    /// Converts to an array.
    #[inline]
    pub const fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Converts to a single-precision array.
    #[inline]
    pub fn to_array32(self) -> [f32; 2] {
        [self.x as f32, self.y as f32]
    }

    /// Reads two consecutive values starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `array` holds fewer than `offset + 2` values.
    pub fn from_slice(&mut self, array: &[f64], offset: usize) -> &mut Self {
        self.x = array[offset];
        self.y = array[offset + 1];
        self
    }

    /// Writes the components into `target` starting at `offset`.
    pub fn write_to_slice(self, target: &mut [f64], offset: usize) {
        target[offset..offset + 2].copy_from_slice(&self.to_array());
    }

    /// Sets both components.
    #[inline]
    pub fn set(&mut self, x: f64, y: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Sets both components to `scalar`.
    #[inline]
    pub fn set_scalar(&mut self, scalar: f64) -> &mut Self {
        self.set(scalar, scalar)
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

    /// Sets a component by index.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] for `index >= 2`.
    pub fn set_component(&mut self, index: usize, value: f64) -> Result<&mut Self> {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            _ => return Err(Error::IndexOutOfRange { index, len: 2 }),
        }
        Ok(self)
    }

    /// Gets a component by index.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] for `index >= 2`.
    pub fn get_component(&self, index: usize) -> Result<f64> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            _ => Err(Error::IndexOutOfRange { index, len: 2 }),
        }
    }

    /// Adds `v`.
    #[inline]
    pub fn add(&mut self, v: Vector2) -> &mut Self {
        self.x += v.x;
        self.y += v.y;
        self
    }

    /// Adds `s` to both components.
    #[inline]
    pub fn add_scalar(&mut self, s: f64) -> &mut Self {
        self.x += s;
        self.y += s;
        self
    }

    /// Sets this vector to `a + b`.
    #[inline]
    pub fn add_vectors(&mut self, a: Vector2, b: Vector2) -> &mut Self {
        self.set(a.x + b.x, a.y + b.y)
    }

    /// Adds `v * s`.
    #[inline]
    pub fn add_scaled_vector(&mut self, v: Vector2, s: f64) -> &mut Self {
        self.x += v.x * s;
        self.y += v.y * s;
        self
    }

    /// Subtracts `v`.
    #[inline]
    pub fn sub(&mut self, v: Vector2) -> &mut Self {
        self.x -= v.x;
        self.y -= v.y;
        self
    }

    /// Subtracts `s` from both components.
    #[inline]
    pub fn sub_scalar(&mut self, s: f64) -> &mut Self {
        self.x -= s;
        self.y -= s;
        self
    }

    /// Sets this vector to `a - b`.
    #[inline]
    pub fn sub_vectors(&mut self, a: Vector2, b: Vector2) -> &mut Self {
        self.set(a.x - b.x, a.y - b.y)
    }

    /// Multiplies component-wise.
    #[inline]
    pub fn multiply(&mut self, v: Vector2) -> &mut Self {
        self.x *= v.x;
        self.y *= v.y;
        self
    }

    /// Multiplies by `scalar`; an infinite scalar zeroes the vector.
    pub fn multiply_scalar(&mut self, scalar: f64) -> &mut Self {
        if scalar.is_infinite() {
            self.set_scalar(0.0)
        } else {
            self.x *= scalar;
            self.y *= scalar;
            self
        }
    }

    /// Sets this vector to `a * b` component-wise.
    #[inline]
    pub fn multiply_vectors(&mut self, a: Vector2, b: Vector2) -> &mut Self {
        self.set(a.x * b.x, a.y * b.y)
    }

    /// Divides component-wise.
    #[inline]
    pub fn divide(&mut self, v: Vector2) -> &mut Self {
        self.x /= v.x;
        self.y /= v.y;
        self
    }

    /// Divides by `scalar` via `multiply_scalar(1 / scalar)`.
    #[inline]
    pub fn divide_scalar(&mut self, scalar: f64) -> &mut Self {
        self.multiply_scalar(1.0 / scalar)
    }

    /// Transforms as a 2D point by a homogeneous 3x3 matrix.
    pub fn apply_matrix3(&mut self, m: &Matrix3) -> &mut Self {
        let (x, y) = (self.x, self.y);
        let e = &m.elements;

        self.x = e[0] * x + e[3] * y + e[6];
        self.y = e[1] * x + e[4] * y + e[7];
        self
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(&mut self, v: Vector2) -> &mut Self {
        self.x = self.x.min(v.x);
        self.y = self.y.min(v.y);
        self
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(&mut self, v: Vector2) -> &mut Self {
        self.x = self.x.max(v.x);
        self.y = self.y.max(v.y);
        self
    }

    /// Clamps each component between `min` and `max`.
    pub fn clamp(&mut self, min: Vector2, max: Vector2) -> &mut Self {
        self.x = clamp(self.x, min.x, max.x);
        self.y = clamp(self.y, min.y, max.y);
        self
    }

    /// Clamps both components between two scalars.
    pub fn clamp_scalar(&mut self, min: f64, max: f64) -> &mut Self {
        self.clamp(Vector2::splat(min), Vector2::splat(max))
    }

    /// Rescales so the length lies in `[min, max]`.
    pub fn clamp_length(&mut self, min: f64, max: f64) -> &mut Self {
        let length = self.length();
        self.multiply_scalar(min.max(max.min(length)) / length)
    }

    /// Floors each component.
    #[inline]
    pub fn floor(&mut self) -> &mut Self {
        self.set(self.x.floor(), self.y.floor())
    }

    /// Ceils each component.
    #[inline]
    pub fn ceil(&mut self) -> &mut Self {
        self.set(self.x.ceil(), self.y.ceil())
    }

    /// Rounds half up.
    #[inline]
    pub fn round(&mut self) -> &mut Self {
        self.set(crate::round(self.x), crate::round(self.y))
    }

    /// Rounds toward zero.
    #[inline]
    pub fn round_to_zero(&mut self) -> &mut Self {
        self.set(self.x.trunc(), self.y.trunc())
    }

    /// Negates both components.
    #[inline]
    pub fn negate(&mut self) -> &mut Self {
        self.set(-self.x, -self.y)
    }

    /// Dot product.
    #[inline]
    pub fn dot(&self, v: Vector2) -> f64 {
        self.x * v.x + self.y * v.y
    }

    /// Squared length.
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
        self.x.abs() + self.y.abs()
    }

    /// Scales to unit length. A zero vector stays zero.
    #[inline]
    pub fn normalize(&mut self) -> &mut Self {
        let length = self.length();
        self.divide_scalar(length)
    }

    /// Scales to the given length.
    pub fn set_length(&mut self, length: f64) -> &mut Self {
        self.normalize().multiply_scalar(length)
    }

    /// Angle of the vector relative to +x, in `[0, 2pi)`.
    pub fn angle(&self) -> f64 {
        let angle = self.y.atan2(self.x);
        if angle < 0.0 {
            angle + 2.0 * std::f64::consts::PI
        } else {
            angle
        }
    }

    /// Linear interpolation toward `v`.
    pub fn lerp(&mut self, v: Vector2, alpha: f64) -> &mut Self {
        self.x += (v.x - self.x) * alpha;
        self.y += (v.y - self.y) * alpha;
        self
    }

    /// Sets this vector to the interpolation between `v1` and `v2`.
    pub fn lerp_vectors(&mut self, v1: Vector2, v2: Vector2, alpha: f64) -> &mut Self {
        self.sub_vectors(v2, v1).multiply_scalar(alpha).add(v1)
    }

    /// Reflects off the line orthogonal to the unit-length `normal`.
    pub fn reflect(&mut self, normal: Vector2) -> &mut Self {
        let mut offset = normal;
        offset.multiply_scalar(2.0 * self.dot(normal));
        self.sub(offset)
    }

    /// Euclidean distance to `v`.
    #[inline]
    pub fn distance_to(&self, v: Vector2) -> f64 {
        self.distance_to_squared(v).sqrt()
    }

    /// Squared distance to `v`.
    #[inline]
    pub fn distance_to_squared(&self, v: Vector2) -> f64 {
        let dx = self.x - v.x;
        let dy = self.y - v.y;
        dx * dx + dy * dy
    }

    /// Manhattan distance to `v`.
    #[inline]
    pub fn distance_to_manhattan(&self, v: Vector2) -> f64 {
        (self.x - v.x).abs() + (self.y - v.y).abs()
    }
}

impl Index<usize> for Vector2 {
    type Output = f64;

    #[inline]
    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Vector2 index out of bounds: {}", index),
        }
    }
}

impl IndexMut<usize> for Vector2 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => panic!("Vector2 index out of bounds: {}", index),
        }
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<[f64; 2]> for Vector2 {
    fn from(a: [f64; 2]) -> Self {
        Self::from_array(a)
    }
}

impl From<glam::DVec2> for Vector2 {
    fn from(v: glam::DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for glam::DVec2 {
    fn from(v: Vector2) -> Self {
        glam::DVec2::new(v.x, v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_components() {
        let mut a = Vector2::ZERO;
        a.set_component(0, 1.0).unwrap().set_component(1, 2.0).unwrap();
        assert_eq!(a, Vector2::new(1.0, 2.0));
        assert_eq!(a[1], 2.0);
        assert_eq!(
            a.get_component(2),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_arithmetic() {
        let mut a = Vector2::new(2.0, 3.0);
        a.add(Vector2::new(-2.0, -3.0));
        assert_eq!(a, Vector2::ZERO);

        a.add_vectors(Vector2::new(1.0, 1.0), Vector2::new(2.0, 3.0));
        assert_eq!(a, Vector2::new(3.0, 4.0));
        assert_eq!(a.length(), 5.0);

        a.multiply(Vector2::new(2.0, 0.5));
        assert_eq!(a, Vector2::new(6.0, 2.0));

        a.divide_scalar(2.0);
        assert_eq!(a, Vector2::new(3.0, 1.0));
    }

    #[test]
    fn test_normalize_zero() {
        let mut a = Vector2::ZERO;
        a.normalize();
        assert_eq!(a, Vector2::ZERO);

        let mut b = Vector2::new(0.0, -4.0);
        b.normalize();
        assert_eq!(b, Vector2::new(0.0, -1.0));
    }

    #[test]
    fn test_angle() {
        assert_eq!(Vector2::X.angle(), 0.0);
        assert_eq!(Vector2::Y.angle(), PI / 2.0);
        assert_eq!(Vector2::new(0.0, -1.0).angle(), 1.5 * PI);
    }

    #[test]
    fn test_apply_matrix3_translates() {
        let mut m = Matrix3::IDENTITY;
        m.set(1.0, 0.0, 5.0, 0.0, 1.0, -2.0, 0.0, 0.0, 1.0);

        let mut p = Vector2::new(1.0, 1.0);
        p.apply_matrix3(&m);
        assert_eq!(p, Vector2::new(6.0, -1.0));
    }

    #[test]
    fn test_clamp_and_round() {
        let mut a = Vector2::new(-3.6, 7.2);
        a.clamp_scalar(-2.0, 2.0);
        assert_eq!(a, Vector2::new(-2.0, 2.0));

        a.set(-1.5, 1.5).round();
        assert_eq!(a, Vector2::new(-1.0, 2.0));

        a.set(-1.5, 1.5).round_to_zero();
        assert_eq!(a, Vector2::new(-1.0, 1.0));
    }

    #[test]
    fn test_clamp_inverted_bounds_min_wins() {
        let mut a = Vector2::new(-4.0, 6.0);
        a.clamp(Vector2::new(-2.0, 3.0), Vector2::new(2.0, -3.0));
        assert_eq!(a, Vector2::new(-2.0, 3.0));

        a.set(0.0, 0.0).clamp_scalar(1.0, -1.0);
        assert_eq!(a, Vector2::new(1.0, 1.0));
    }

    #[test]
    fn test_distances() {
        let a = Vector2::new(1.0, 1.0);
        let b = Vector2::new(4.0, 5.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(a.distance_to_squared(b), 25.0);
        assert_eq!(a.distance_to_manhattan(b), 7.0);
    }
}
