//! Bounding sphere.

use crate::{Box3, Matrix4, Vector3};

/// Sphere given by center and radius. A radius of zero or less marks it empty.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    /// Center point
    pub center: Vector3,
    /// Radius
    pub radius: f64,
}

impl Sphere {
    /// Creates a sphere.
    #[inline]
    pub const fn new(center: Vector3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Sets center and radius.
    pub fn set(&mut self, center: Vector3, radius: f64) -> &mut Self {
        self.center = center;
        self.radius = radius;
        self
    }

    /// Encloses `points`.
    ///
    /// The center is `center` if given, otherwise the center of the points'
    /// bounding box; the radius is the farthest point's distance from it.
    /// This is not the minimal enclosing sphere.
    pub fn set_from_points(&mut self, points: &[Vector3], center: Option<Vector3>) -> &mut Self {
        self.center = center.unwrap_or_else(|| {
            let mut bounds = Box3::EMPTY;
            bounds.set_from_points(points).center()
        });

        let max_sq = points
            .iter()
            .map(|p| self.center.distance_to_squared(*p))
            .fold(0.0, f64::max);
        self.radius = max_sq.sqrt();
        self
    }

    /// `true` for a zero or negative radius.
    pub fn is_empty(&self) -> bool {
        self.radius <= 0.0
    }

    /// Inclusive point test.
    pub fn contains_point(&self, point: Vector3) -> bool {
        point.distance_to_squared(self.center) <= self.radius * self.radius
    }

    /// Signed distance to the surface; negative inside.
    pub fn distance_to_point(&self, point: Vector3) -> f64 {
        point.distance_to(self.center) - self.radius
    }

    /// `true` if the spheres overlap or touch.
    pub fn intersects_sphere(&self, other: &Sphere) -> bool {
        let radius_sum = self.radius + other.radius;
        other.center.distance_to_squared(self.center) <= radius_sum * radius_sum
    }

    /// Closest point of the ball to `point`.
    pub fn clamp_point(&self, point: Vector3) -> Vector3 {
        if self.center.distance_to_squared(point) <= self.radius * self.radius {
            return point;
        }
        let mut p = point;
        p.sub(self.center).normalize().multiply_scalar(self.radius).add(self.center);
        p
    }

    /// Tight axis-aligned box around the sphere.
    pub fn get_bounding_box(&self) -> Box3 {
        let mut b = Box3::new(self.center, self.center);
        b.expand_by_scalar(self.radius);
        b
    }

    /// Moves the center by `m` and scales the radius by its largest axis
    /// scale, so the result still encloses the transformed sphere.
    pub fn apply_matrix4(&mut self, m: &Matrix4) -> &mut Self {
        self.center.apply_matrix4(m);
        self.radius *= m.get_max_scale_on_axis();
        self
    }

    /// Moves the center by `offset`.
    pub fn translate(&mut self, offset: Vector3) -> &mut Self {
        self.center.add(offset);
        self
    }
}
