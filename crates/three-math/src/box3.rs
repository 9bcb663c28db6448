//! Axis-aligned bounding box.
//!
//! An empty box is stored canonically as `min = +f64::MAX`,
//! `max = -f64::MAX`, so expanding it by any point yields that point.
//! Operations that can produce an inverted box ([`Box3::intersect`]) collapse
//! back to this representation instead of leaving partial bounds behind.
//!
//! # Usage
//!
//! ```rust
//! use three_math::{Box3, Vector3};
//!
//! let mut b = Box3::EMPTY;
//! b.expand_by_point(Vector3::new(1.0, 1.0, 1.0))
//!     .expand_by_point(Vector3::new(-1.0, -1.0, -1.0));
//!
//! assert_eq!(b.size(), Vector3::new(2.0, 2.0, 2.0));
//! assert!(b.contains_point(Vector3::ZERO));
//! ```

use std::fmt;

use crate::{Matrix4, Sphere, Vector3};

/// Axis-aligned box given by its lower and upper corners.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Box3 {
    /// Lower corner
    pub min: Vector3,
    /// Upper corner
    pub max: Vector3,
}

impl Default for Box3 {
    /// The canonical empty box.
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Box3 {
    /// Canonical empty box.
    pub const EMPTY: Self = Self::new(Vector3::MAX, Vector3::MIN);

    /// Creates a box from its corners.
    #[inline]
    pub const fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    /// Sets both corners.
    pub fn set(&mut self, min: Vector3, max: Vector3) -> &mut Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Fits packed `xyz` triples. A trailing partial triple is ignored and
    /// an empty slice leaves the box empty.
    pub fn set_from_array(&mut self, array: &[f64]) -> &mut Self {
        self.make_empty();
        for xyz in array.chunks_exact(3) {
            self.expand_by_point(Vector3::new(xyz[0], xyz[1], xyz[2]));
        }
        self
    }

    /// Fits the given points.
    pub fn set_from_points(&mut self, points: &[Vector3]) -> &mut Self {
        self.make_empty();
        for &point in points {
            self.expand_by_point(point);
        }
        self
    }

    /// Centers the box on `center` with extents `size`.
    pub fn set_from_center_and_size(&mut self, center: Vector3, size: Vector3) -> &mut Self {
        let mut half = size;
        half.multiply_scalar(0.5);

        self.min = center;
        self.min.sub(half);
        self.max = center;
        self.max.add(half);
        self
    }

    /// Resets to the canonical empty box.
    pub fn make_empty(&mut self) -> &mut Self {
        *self = Self::EMPTY;
        self
    }

    /// `true` if `max < min` on any axis.
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Midpoint of the corners.
    pub fn center(&self) -> Vector3 {
        let mut c = Vector3::ZERO;
        c.add_vectors(self.min, self.max).multiply_scalar(0.5);
        c
    }

    /// Extents along each axis.
    pub fn size(&self) -> Vector3 {
        let mut s = Vector3::ZERO;
        s.sub_vectors(self.max, self.min);
        s
    }

    /// Grows to include `point`.
    pub fn expand_by_point(&mut self, point: Vector3) -> &mut Self {
        self.min.min(point);
        self.max.max(point);
        self
    }

    /// Grows both corners outward by `v`.
    pub fn expand_by_vector(&mut self, v: Vector3) -> &mut Self {
        self.min.sub(v);
        self.max.add(v);
        self
    }

    /// Grows both corners outward by `scalar` on every axis.
    pub fn expand_by_scalar(&mut self, scalar: f64) -> &mut Self {
        self.min.add_scalar(-scalar);
        self.max.add_scalar(scalar);
        self
    }

    /// Inclusive point test.
    pub fn contains_point(&self, point: Vector3) -> bool {
        !(point.x < self.min.x
            || point.x > self.max.x
            || point.y < self.min.y
            || point.y > self.max.y
            || point.z < self.min.z
            || point.z > self.max.z)
    }

    /// `true` if `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &Box3) -> bool {
        self.min.x <= other.min.x
            && other.max.x <= self.max.x
            && self.min.y <= other.min.y
            && other.max.y <= self.max.y
            && self.min.z <= other.min.z
            && other.max.z <= self.max.z
    }

    /// Position of `point` relative to the box, `(0,0,0)` at `min` and
    /// `(1,1,1)` at `max`.
    ///
    /// An axis with zero extent yields `inf` or `NaN` on that axis.
    pub fn get_parameter(&self, point: Vector3) -> Vector3 {
        Vector3::new(
            (point.x - self.min.x) / (self.max.x - self.min.x),
            (point.y - self.min.y) / (self.max.y - self.min.y),
            (point.z - self.min.z) / (self.max.z - self.min.z),
        )
    }

    /// Separating-axis overlap test; touching boxes intersect.
    pub fn intersects_box(&self, other: &Box3) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y
            || other.max.z < self.min.z
            || other.min.z > self.max.z)
    }

    /// `true` if the closest point of the box lies within the sphere.
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        let closest = self.clamp_point(sphere.center);
        closest.distance_to_squared(sphere.center) <= sphere.radius * sphere.radius
    }

    /// Closest point of the box to `point`.
    pub fn clamp_point(&self, point: Vector3) -> Vector3 {
        let mut p = point;
        p.clamp(self.min, self.max);
        p
    }

    /// Distance from `point` to the box; 0 inside.
    pub fn distance_to_point(&self, point: Vector3) -> f64 {
        self.clamp_point(point).distance_to(point)
    }

    /// Sphere through the corners, centered on the box.
    pub fn get_bounding_sphere(&self) -> Sphere {
        Sphere::new(self.center(), self.size().length() * 0.5)
    }

    /// Shrinks to the overlap with `other`; no overlap gives the canonical
    /// empty box.
    pub fn intersect(&mut self, other: &Box3) -> &mut Self {
        self.min.max(other.min);
        self.max.min(other.max);

        if self.is_empty() {
            self.make_empty();
        }
        self
    }

    /// Grows to include `other`.
    pub fn union(&mut self, other: &Box3) -> &mut Self {
        self.min.min(other.min);
        self.max.max(other.max);
        self
    }

    /// Transforms all eight corners and refits. An empty box stays empty.
    pub fn apply_matrix4(&mut self, m: &Matrix4) -> &mut Self {
        if self.is_empty() {
            return self;
        }

        let (lo, hi) = (self.min, self.max);
        let corners: [Vector3; 8] = std::array::from_fn(|i| {
            let mut p = Vector3::new(
                if i & 0b100 == 0 { lo.x } else { hi.x },
                if i & 0b010 == 0 { lo.y } else { hi.y },
                if i & 0b001 == 0 { lo.z } else { hi.z },
            );
            p.apply_matrix4(m);
            p
        });

        self.set_from_points(&corners)
    }

    /// Moves both corners by `offset`.
    pub fn translate(&mut self, offset: Vector3) -> &mut Self {
        self.min.add(offset);
        self.max.add(offset);
        self
    }
}

impl fmt::Display for Box3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Box3 {{ min: {}, max: {} }}", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_4;

    fn unit_box() -> Box3 {
        Box3::new(Vector3::ZERO, Vector3::ONE)
    }

    #[test]
    fn test_default_is_canonical_empty() {
        let b = Box3::default();
        assert!(b.is_empty());
        assert_eq!(b.min, Vector3::MAX);
        assert_eq!(b.max, Vector3::MIN);

        let mut b = unit_box();
        assert!(!b.is_empty());
        assert!(b.make_empty().is_empty());
        assert_eq!(b, Box3::EMPTY);
    }

    #[test]
    fn test_expand_from_point_box() {
        let mut b = Box3::EMPTY;
        b.set(Vector3::ZERO, Vector3::ZERO);
        b.expand_by_point(Vector3::ONE)
            .expand_by_point(Vector3::new(-1.0, -1.0, -1.0));

        assert_eq!(b.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(b.max, Vector3::ONE);
        assert_eq!(b.center(), Vector3::ZERO);
        assert_eq!(b.size(), Vector3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_set_from_array_negative_coordinates() {
        // all-negative data must still produce a correct upper corner
        let mut b = Box3::EMPTY;
        b.set_from_array(&[-3.0, -2.0, -5.0, -1.0, -4.0, -2.0, 9.0]);
        assert_eq!(b.min, Vector3::new(-3.0, -4.0, -5.0));
        assert_eq!(b.max, Vector3::new(-1.0, -2.0, -2.0));

        b.set_from_array(&[]);
        assert!(b.is_empty());
    }

    #[test]
    fn test_set_from_points_and_center_size() {
        let mut b = Box3::EMPTY;
        b.set_from_points(&[Vector3::new(2.0, 0.0, 1.0), Vector3::new(-2.0, 4.0, 1.0)]);
        assert_eq!(b.center(), Vector3::new(0.0, 2.0, 1.0));
        assert_eq!(b.size(), Vector3::new(4.0, 4.0, 0.0));

        let mut c = Box3::EMPTY;
        c.set_from_center_and_size(b.center(), b.size());
        assert_eq!(c, b);
    }

    #[test]
    fn test_expand_by_vector_and_scalar() {
        let mut b = unit_box();
        b.expand_by_vector(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(b.min, Vector3::new(-1.0, -2.0, -3.0));
        assert_eq!(b.max, Vector3::new(2.0, 3.0, 4.0));

        let mut b = unit_box();
        b.expand_by_scalar(-0.5);
        assert_eq!(b.size(), Vector3::ZERO);
        assert!(!b.is_empty());
    }

    #[test]
    fn test_contains() {
        let b = unit_box();
        assert!(b.contains_point(Vector3::ZERO));
        assert!(b.contains_point(Vector3::ONE));
        assert!(!b.contains_point(Vector3::new(1.0, 1.0, 1.5)));

        let inner = Box3::new(Vector3::splat(0.25), Vector3::splat(0.75));
        assert!(b.contains_box(&inner));
        assert!(!inner.contains_box(&b));
        assert!(b.contains_box(&b));
    }

    #[test]
    fn test_get_parameter() {
        let b = Box3::new(Vector3::ZERO, Vector3::new(2.0, 4.0, 8.0));
        assert_eq!(b.get_parameter(Vector3::new(1.0, 1.0, 8.0)), Vector3::new(0.5, 0.25, 1.0));

        // zero extent on x propagates
        let flat = Box3::new(Vector3::ZERO, Vector3::new(0.0, 1.0, 1.0));
        let p = flat.get_parameter(Vector3::new(1.0, 0.5, 0.5));
        assert!(p.x.is_infinite());
        assert!(flat.get_parameter(Vector3::ZERO).x.is_nan());
    }

    #[test]
    fn test_intersect_disjoint_is_canonical_empty() {
        let mut a = unit_box();
        let b = Box3::new(Vector3::splat(2.0), Vector3::splat(3.0));
        assert!(!a.intersects_box(&b));

        a.intersect(&b);
        assert!(a.is_empty());
        assert_eq!(a, Box3::EMPTY);

        // a later union behaves as if starting from nothing
        a.union(&b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_intersect_overlap() {
        let mut a = unit_box();
        let b = Box3::new(Vector3::splat(0.5), Vector3::splat(2.0));
        assert!(a.intersects_box(&b));

        a.intersect(&b);
        assert_eq!(a, Box3::new(Vector3::splat(0.5), Vector3::ONE));

        // touching faces count as intersecting
        let touching = Box3::new(Vector3::new(1.0, 0.0, 0.0), Vector3::new(2.0, 1.0, 1.0));
        assert!(unit_box().intersects_box(&touching));
    }

    #[test]
    fn test_clamp_and_distance() {
        let b = unit_box();
        assert_eq!(b.clamp_point(Vector3::new(2.0, 0.5, -1.0)), Vector3::new(1.0, 0.5, 0.0));
        assert_eq!(b.distance_to_point(Vector3::splat(0.5)), 0.0);
        assert_eq!(b.distance_to_point(Vector3::new(3.0, 0.5, 0.5)), 2.0);
    }

    #[test]
    fn test_sphere_relations() {
        let b = unit_box();
        let s = b.get_bounding_sphere();
        assert_eq!(s.center, Vector3::splat(0.5));
        assert!((s.radius - 3f64.sqrt() * 0.5).abs() < 1e-12);

        assert!(b.intersects_sphere(&Sphere::new(Vector3::new(2.0, 0.5, 0.5), 1.0)));
        assert!(!b.intersects_sphere(&Sphere::new(Vector3::new(2.0, 2.0, 2.0), 1.0)));
    }

    #[test]
    fn test_apply_matrix4_rotates_corners() {
        let mut b = Box3::new(Vector3::splat(-1.0), Vector3::ONE);
        let mut m = Matrix4::IDENTITY;
        m.make_rotation_z(FRAC_PI_4);
        b.apply_matrix4(&m);

        let r = 2f64.sqrt();
        assert_abs_diff_eq!(b.min.to_array()[..], [-r, -r, -1.0][..], epsilon = 1e-12);
        assert_abs_diff_eq!(b.max.to_array()[..], [r, r, 1.0][..], epsilon = 1e-12);

        let mut empty = Box3::EMPTY;
        empty.apply_matrix4(&m);
        assert_eq!(empty, Box3::EMPTY);
    }

    #[test]
    fn test_translate() {
        let mut b = unit_box();
        b.translate(Vector3::new(1.0, -1.0, 0.0));
        assert_eq!(b, Box3::new(Vector3::new(1.0, -1.0, 0.0), Vector3::new(2.0, 0.0, 1.0)));
    }
}
